//! Component boundary scanning over the working line buffer.
//!
//! Only `BEGIN:`/`END:` markers are interpreted here. Nesting is tracked with
//! an explicit stack of open component names, so a component's matching END
//! is found regardless of what it contains.

use super::lexer::{parse_content_line, read_property};
use super::lines::LineStore;
use crate::rfc::ical::core::{ComponentSpan, ContentLine, names};

/// A component boundary line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Marker {
    Begin(String),
    End(String),
}

impl Marker {
    /// Type name carried by the marker.
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            Self::Begin(name) | Self::End(name) => name,
        }
    }
}

/// Which component types [`find_component`] looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentPattern<'a> {
    /// Any component; the matched type name is reported back.
    Any,
    /// One component type, compared case-insensitively.
    Named(&'a str),
}

impl ComponentPattern<'_> {
    fn accepts(self, type_name: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Named(name) => name.eq_ignore_ascii_case(type_name),
        }
    }
}

/// Result of a successful [`find_component`] search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundMarker {
    pub index: usize,
    pub type_name: String,
}

/// Classifies a working line as a BEGIN or END marker.
///
/// This is silent: scanning may look at the same line many times, and the
/// property reader reports malformed lines when they are read as properties.
#[must_use]
pub fn marker(line: &str) -> Option<Marker> {
    let cl = parse_content_line(line).ok()?;
    let type_name = cl.raw_value.trim().to_string();
    if cl.is(names::BEGIN) {
        Some(Marker::Begin(type_name))
    } else if cl.is(names::END) {
        Some(Marker::End(type_name))
    } else {
        None
    }
}

fn marker_at(store: &LineStore, index: usize) -> Option<Marker> {
    store.working(index).and_then(marker)
}

/// Scans forward from `start` for a `BEGIN:<type>` line, or an `END:<type>`
/// line when `is_end` is set.
///
/// Trailing blank lines are outside the scanned range. Returns `None` when
/// no such line exists before the scan bound.
#[must_use]
pub fn find_component(
    store: &LineStore,
    start: usize,
    pattern: ComponentPattern<'_>,
    is_end: bool,
) -> Option<FoundMarker> {
    (start..store.scan_bound()).find_map(|index| {
        let found = marker_at(store, index)?;
        let wanted = matches!((&found, is_end), (Marker::Begin(_), false) | (Marker::End(_), true));
        (wanted && pattern.accepts(found.type_name())).then(|| FoundMarker {
            index,
            type_name: found.type_name().to_string(),
        })
    })
}

/// Where the component starting at an index closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Closing {
    NotABegin,
    EndsAt(usize),
    Unterminated { bound: usize },
}

fn closing(store: &LineStore, index: usize) -> Closing {
    let Some(Marker::Begin(first)) = marker_at(store, index) else {
        return Closing::NotABegin;
    };

    let bound = store.scan_bound();
    let mut open = vec![first];

    for i in index + 1..bound {
        match marker_at(store, i) {
            Some(Marker::Begin(name)) => open.push(name),
            Some(Marker::End(name)) => {
                match open.iter().rposition(|o| o.eq_ignore_ascii_case(&name)) {
                    Some(depth) => {
                        if depth + 1 != open.len() {
                            tracing::warn!(
                                line = i,
                                component = %name,
                                unclosed = ?&open[depth + 1..],
                                "END closes outer component, nested components left open"
                            );
                        }
                        open.truncate(depth);
                    }
                    None => {
                        tracing::warn!(line = i, component = %name, "END without matching BEGIN");
                    }
                }
                if open.is_empty() {
                    return Closing::EndsAt(i);
                }
            }
            None => {}
        }
    }

    tracing::warn!(
        line = index,
        component = ?open.first(),
        bound,
        "Component END not found"
    );
    Closing::Unterminated { bound }
}

/// Number of lines spanned by the component starting at `index`, both
/// markers and any nested components included.
///
/// Returns 0 if the line at `index` is not a BEGIN line. An unterminated
/// component extends to the scan bound.
#[must_use]
pub fn skip_component(store: &LineStore, index: usize) -> usize {
    match closing(store, index) {
        Closing::NotABegin => 0,
        Closing::EndsAt(end) => end - index + 1,
        Closing::Unterminated { bound } => bound.saturating_sub(index).max(1),
    }
}

/// The span of the component starting at `index`, if that line is a BEGIN
/// line with a matching END.
#[must_use]
pub fn span_at(store: &LineStore, index: usize) -> Option<ComponentSpan> {
    let Closing::EndsAt(end) = closing(store, index) else {
        return None;
    };
    let type_name = marker_at(store, index)?.type_name().to_string();
    Some(ComponentSpan {
        type_name,
        start: index,
        end,
    })
}

/// Properties directly inside `span`, with their line indices.
///
/// Nested components are skipped as a whole, so only the span's own
/// properties are returned.
#[must_use]
pub fn top_level_properties(store: &LineStore, span: &ComponentSpan) -> Vec<(usize, ContentLine)> {
    let mut properties = Vec::new();
    let mut i = span.start + 1;

    while i < span.end {
        let nested = skip_component(store, i);
        if nested > 0 {
            i += nested;
            continue;
        }
        if let Some(line) = store.working(i)
            && let Some(property) = read_property(line, i)
            && !property.is(names::END)
        {
            properties.push((i, property));
        }
        i += 1;
    }

    properties
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(lines: &[&str]) -> LineStore {
        let mut text = lines.join("\r\n");
        text.push_str("\r\n");
        let mut store = LineStore::split(&text);
        store.unfold();
        store
    }

    fn calendar() -> LineStore {
        store(&[
            "BEGIN:VCALENDAR",
            "X-WR-CALNAME:Football",
            "BEGIN:VEVENT",
            "SUMMARY:Match",
            "BEGIN:VALARM",
            "TRIGGER:-PT10M",
            "END:VALARM",
            "DTSTART:20240615T190000",
            "END:VEVENT",
            "begin:vtodo",
            "SUMMARY:Buy",
            "end:vtodo",
            "VERSION:2.0",
            "END:VCALENDAR",
        ])
    }

    #[test]
    fn marker_is_case_insensitive() {
        assert_eq!(marker("begin:vevent"), Some(Marker::Begin("vevent".into())));
        assert_eq!(marker("END:VTODO"), Some(Marker::End("VTODO".into())));
        assert_eq!(marker("SUMMARY:BEGIN"), None);
        assert_eq!(marker(" "), None);
    }

    #[test]
    fn find_named_and_any() {
        let store = calendar();
        let found = find_component(&store, 1, ComponentPattern::Named("VTODO"), false).unwrap();
        assert_eq!(found.index, 9);
        assert_eq!(found.type_name, "vtodo");

        let any = find_component(&store, 3, ComponentPattern::Any, false).unwrap();
        assert_eq!(any.index, 4);
        assert_eq!(any.type_name, "VALARM");

        let end = find_component(&store, 0, ComponentPattern::Named("vcalendar"), true).unwrap();
        assert_eq!(end.index, 13);
    }

    #[test]
    fn find_reports_missing_component() {
        let store = calendar();
        assert!(find_component(&store, 0, ComponentPattern::Named("VJOURNAL"), false).is_none());
        assert!(find_component(&store, 10, ComponentPattern::Named("VEVENT"), false).is_none());
    }

    #[test]
    fn skip_counts_nested_components() {
        let store = calendar();
        assert_eq!(skip_component(&store, 2), 7);
        assert_eq!(skip_component(&store, 4), 3);
        assert_eq!(skip_component(&store, 0), 14);
        assert_eq!(skip_component(&store, 3), 0);
    }

    #[test_log::test]
    fn skip_recovers_from_unclosed_nested_component() {
        let store = store(&[
            "BEGIN:VEVENT",
            "BEGIN:VALARM",
            "TRIGGER:-PT5M",
            "END:VEVENT",
            "SUMMARY:after",
        ]);
        assert_eq!(skip_component(&store, 0), 4);
    }

    #[test_log::test]
    fn unterminated_component_runs_to_bound() {
        let store = store(&["BEGIN:VEVENT", "SUMMARY:x", "DTSTART:20240101"]);
        assert_eq!(skip_component(&store, 0), 3);
        assert!(span_at(&store, 0).is_none());
    }

    #[test]
    fn span_at_begin_line() {
        let store = calendar();
        let span = span_at(&store, 2).unwrap();
        assert_eq!(span.type_name, "VEVENT");
        assert_eq!((span.start, span.end), (2, 8));
        assert!(span_at(&store, 1).is_none());
    }

    #[test]
    fn top_level_properties_skip_nested_bodies() {
        let store = calendar();
        let cal = span_at(&store, 0).unwrap();
        let props: Vec<String> = top_level_properties(&store, &cal)
            .into_iter()
            .map(|(_, p)| p.name)
            .collect();
        assert_eq!(props, ["X-WR-CALNAME", "VERSION"]);

        let event = span_at(&store, 2).unwrap();
        let props: Vec<(usize, String)> = top_level_properties(&store, &event)
            .into_iter()
            .map(|(i, p)| (i, p.name))
            .collect();
        assert_eq!(props, [(3, "SUMMARY".into()), (7, "DTSTART".into())]);
    }
}
