//! HTML fragments for the filter panel and result blocks.

use crate::highlight::{html_escape, HighlightedResult, Region};
use crate::query::{AppliedFilter, DerivedUrl};

/// Applied-filter chips, each with its remove link.
///
/// The `data-filter-name` attribute carries the wire name so the page can
/// ask for a fresh remove href when the context changes.
pub fn filter_chips(chips: &[(AppliedFilter, DerivedUrl)]) -> String {
    if chips.is_empty() {
        return r#"<div class="applied-filters empty"></div>"#.to_string();
    }

    let items: String = chips
        .iter()
        .map(|(applied, url)| {
            let name = applied.filter.wire_name();
            let description = match (applied.value.is_empty(), applied.comparison) {
                (true, _) => "sin valor".to_string(),
                (false, Some(comparison)) => {
                    format!("{} {}", comparison.chip_text(), html_escape(&applied.value))
                }
                (false, None) => html_escape(&applied.value),
            };
            format!(
                r#"
        <span class="filter-chip" data-filter="{}">
            <strong>{}</strong> {}
            <a class="filter-link" data-filter-link-type="remove" data-filter-name="{}" href="{}">&times;</a>
        </span>"#,
                name,
                html_escape(applied.filter.label()),
                description,
                name,
                html_escape(url.as_str()),
            )
        })
        .collect();

    format!(
        r#"<div class="applied-filters">{}
</div>"#,
        items
    )
}

/// A result block with its three highlighted regions.
///
/// Region text is already escaped by the highlighter.
pub fn result_block(result: &HighlightedResult) -> String {
    let regions: String = Region::ALL
        .iter()
        .filter(|region| !result.region(**region).is_empty())
        .map(|region| {
            format!(
                r#"
    <p class="{}">{}</p>"#,
                region.css_class(),
                result.region(*region)
            )
        })
        .collect();

    format!(
        r#"<div class="result" data-question-id="{}">{}
</div>"#,
        html_escape(&result.id),
        regions
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{ComparisonOperator, FilterName};
    use crate::query::{LinkBuilder, QueryContext};

    #[test]
    fn test_filter_chips_carry_remove_links() {
        let context = QueryContext::new("titulo", "informes")
            .with_filter("autor", "pérez")
            .with_filter("autor-comparacion", "igualdad")
            .with_filter("area", "salud");
        let chips = LinkBuilder::default().remove_all(&context);
        let html = filter_chips(&chips);

        assert!(html.contains(r#"data-filter-name="autor""#));
        assert!(html.contains(r#"data-filter-name="area""#));
        assert!(html.contains("igual a pérez"));
        assert!(html.contains(
            r#"href="/search?area=salud&amp;buscar-usando=titulo&amp;buscar-dentro-de=informes""#
        ));
    }

    #[test]
    fn test_filter_chips_empty() {
        assert!(filter_chips(&[]).contains("empty"));
    }

    #[test]
    fn test_chip_escapes_values() {
        let chips = vec![(
            AppliedFilter {
                filter: FilterName::Informe,
                value: "<93>".into(),
                comparison: Some(ComparisonOperator::DifferentTo),
            },
            LinkBuilder::default().build(&Default::default()),
        )];
        let html = filter_chips(&chips);
        assert!(html.contains("distinto de &lt;93&gt;"));
    }

    #[test]
    fn test_result_block_skips_empty_regions() {
        let result = HighlightedResult {
            id: "7".into(),
            body: "la <mark>ley</mark>".into(),
            context: String::new(),
            answer: "sin respuesta".into(),
        };
        let html = result_block(&result);
        assert!(html.contains(r#"data-question-id="7""#));
        assert!(html.contains(r#"<p class="question-body">la <mark>ley</mark></p>"#));
        assert!(!html.contains("question-context"));
        assert!(html.contains(r#"<p class="question-answer">sin respuesta</p>"#));
    }
}
