//! Day-container scanning and tide-row extraction
//!
//! The forecast site has shipped at least two markup generations (heading tag
//! level, nested unit spans, column layout). Extraction therefore runs
//! ordered fallback chains: the newer, more specific selector first, the
//! older, coarser one after. A miss at row or container level is a skip, not
//! an error.

use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};

use crate::normalize::{parse_datetime_attr, parse_day_heading, parse_height_m, to_24h};
use crate::schema::{DayRecord, TideEvent, TideKind};

/// Container holding today's tide table.
pub const TODAY_SELECTOR: &str = ".tide-header-today";
/// Repeating container, one per future day.
pub const FUTURE_DAY_SELECTOR: &str = ".tide-day";

/// Walk the rendered document and extract every parseable day, in document
/// order with today first. Containers that yield nothing are skipped.
pub fn scan_days(html: &str) -> Vec<DayRecord> {
    let doc = Html::parse_document(html);
    let mut days = Vec::new();

    for sel_str in [TODAY_SELECTOR, FUTURE_DAY_SELECTOR] {
        let Ok(sel) = Selector::parse(sel_str) else {
            continue;
        };
        for container in doc.select(&sel) {
            if let Some(day) = extract_day(container) {
                days.push(day);
            }
        }
    }

    days
}

/// Extract one day's record from a container fragment, or `None` if neither
/// a date nor any tide row can be recovered from it.
pub fn extract_day(container: ElementRef) -> Option<DayRecord> {
    let date = resolve_date(container)?;

    let tides: Vec<TideEvent> = day_rows(container)
        .into_iter()
        .filter_map(extract_row)
        .collect();

    if tides.is_empty() {
        return None;
    }

    Some(DayRecord { date, tides })
}

/// Date resolution strategies, tried in order until one produces a date.
fn resolve_date(container: ElementRef) -> Option<NaiveDate> {
    date_from_heading(container).or_else(|| date_from_datetime_attr(container))
}

/// Textual heading date: the day-specific heading class of the newer markup,
/// then generic sub-headings (the today block uses a bare `h3`).
fn date_from_heading(container: ElementRef) -> Option<NaiveDate> {
    for sel_str in ["h4.tide-day__date", "h3", "h4"] {
        let Ok(sel) = Selector::parse(sel_str) else {
            continue;
        };
        if let Some(date) = container
            .select(&sel)
            .find_map(|el| parse_day_heading(&collect_text(el)))
        {
            return Some(date);
        }
    }
    None
}

/// Machine-readable fallback: a `time` element's `datetime` attribute.
fn date_from_datetime_attr(container: ElementRef) -> Option<NaiveDate> {
    let sel = Selector::parse("time[datetime]").ok()?;
    container
        .select(&sel)
        .find_map(|el| parse_datetime_attr(el.value().attr("datetime")?))
}

/// Rows of the day's tide table; falls back to any row in the container when
/// the table class is absent.
fn day_rows(container: ElementRef) -> Vec<ElementRef> {
    if let Ok(sel) = Selector::parse("table.tide-day-tides tbody tr") {
        let rows: Vec<ElementRef> = container.select(&sel).collect();
        if !rows.is_empty() {
            return rows;
        }
    }
    match Selector::parse("tr") {
        Ok(sel) => container.select(&sel).collect(),
        Err(_) => Vec::new(),
    }
}

/// Turn one table row into a tide event.
///
/// Rows with fewer than three cells are header/separator rows; rows without a
/// recognizable kind marker or extractable metric height are non-tide rows
/// (sunrise/sunset annotations). All of those are skipped.
fn extract_row(row: ElementRef) -> Option<TideEvent> {
    let cell_sel = Selector::parse("td").ok()?;
    let cells: Vec<ElementRef> = row.select(&cell_sel).collect();
    if cells.len() < 3 {
        return None;
    }

    // Site vocabulary, case-sensitive on purpose
    let kind_text = collect_text(cells[0]);
    let kind = if kind_text.contains("High") {
        TideKind::High
    } else if kind_text.contains("Low") {
        TideKind::Low
    } else {
        return None;
    };

    let time_raw = primary_or_full(cells[1], "b");
    let height_raw = primary_or_full(cells[2], "b.js-two-units-length-value__primary");
    let height_m = parse_height_m(&height_raw)?;

    Some(TideEvent {
        time: to_24h(&time_raw),
        kind,
        height_m,
    })
}

/// Prefer a nested primary-value sub-element, else the cell's full text.
/// The dual-unit markup generation wraps the metric value in such an element.
fn primary_or_full(cell: ElementRef, primary: &str) -> String {
    if let Ok(sel) = Selector::parse(primary) {
        if let Some(el) = cell.select(&sel).next() {
            let text = collect_text(el);
            if !text.is_empty() {
                return text;
            }
        }
    }
    collect_text(cell)
}

/// Element text with whitespace collapsed to single spaces.
fn collect_text(el: ElementRef) -> String {
    el.text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_container(html: &str, sel_str: &str) -> DayRecord {
        let doc = Html::parse_document(html);
        let sel = Selector::parse(sel_str).unwrap();
        let container = doc.select(&sel).next().unwrap();
        extract_day(container).unwrap()
    }

    #[test]
    fn test_extract_day_new_markup() {
        let html = r#"
            <div class="tide-day">
              <h4 class="tide-day__date">Tide Times: Wednesday 05 November 2025</h4>
              <table class="tide-day-tides">
                <tbody>
                  <tr><td>High Tide</td><td><b>04:12</b></td>
                      <td><b class="js-two-units-length-value__primary">2.13 m</b> <span>(6.99 ft)</span></td></tr>
                  <tr><td>Low Tide</td><td><b>10:33 AM</b></td>
                      <td><b class="js-two-units-length-value__primary">-0.08 m</b> <span>(-0.26 ft)</span></td></tr>
                </tbody>
              </table>
            </div>
        "#;
        let day = first_container(html, ".tide-day");
        assert_eq!(day.date, NaiveDate::from_ymd_opt(2025, 11, 5).unwrap());
        assert_eq!(day.tides.len(), 2);
        assert_eq!(day.tides[0].kind, TideKind::High);
        assert_eq!(day.tides[0].time, "04:12");
        assert_eq!(day.tides[0].height_m, 2.13);
        assert_eq!(day.tides[1].kind, TideKind::Low);
        assert_eq!(day.tides[1].time, "10:33");
        assert_eq!(day.tides[1].height_m, -0.08);
    }

    #[test]
    fn test_extract_day_old_markup_today_block() {
        // older generation: h3 heading, no primary-unit spans
        let html = r#"
            <div class="tide-header-today">
              <h3>Tide Times for Playa del Inglés: Tuesday 14 March 2025</h3>
              <table class="tide-day-tides">
                <tbody>
                  <tr><td>Low Tide</td><td>6:39 PM</td><td>0.00 m</td></tr>
                </tbody>
              </table>
            </div>
        "#;
        let day = first_container(html, ".tide-header-today");
        assert_eq!(day.date, NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
        assert_eq!(day.tides.len(), 1);
        assert_eq!(day.tides[0].time, "18:39");
        assert_eq!(day.tides[0].height_m, 0.0);
    }

    #[test]
    fn test_extract_day_datetime_attribute_fallback() {
        let html = r#"
            <div class="tide-day">
              <time datetime="2025-11-06T00:00:00">Tomorrow</time>
              <table class="tide-day-tides"><tbody>
                <tr><td>High Tide</td><td>1:05 PM</td><td>2.4 m</td></tr>
              </tbody></table>
            </div>
        "#;
        let day = first_container(html, ".tide-day");
        assert_eq!(day.date, NaiveDate::from_ymd_opt(2025, 11, 6).unwrap());
        assert_eq!(day.tides[0].time, "13:05");
    }

    #[test]
    fn test_extract_day_skips_header_and_unparsable_rows() {
        let html = r#"
            <div class="tide-day">
              <h4 class="tide-day__date">Thursday 06 November 2025</h4>
              <table class="tide-day-tides">
                <tbody>
                  <tr><th>Tide</th><th>Time</th></tr>
                  <tr><td>High Tide</td><td>02:01</td><td>2.2 m</td></tr>
                  <tr><td>Sunrise</td><td>07:30</td><td>—</td></tr>
                  <tr><td>Low Tide</td><td>08:15</td><td>n/a</td></tr>
                  <tr><td>Low Tide</td><td>08:15</td><td>0.4 m</td></tr>
                </tbody>
              </table>
            </div>
        "#;
        let day = first_container(html, ".tide-day");
        // header row (2 cells), sunrise row (no kind), n/a height row all skipped
        assert_eq!(day.tides.len(), 2);
        assert_eq!(day.tides[0].time, "02:01");
        assert_eq!(day.tides[1].height_m, 0.4);
    }

    #[test]
    fn test_extract_day_without_date_is_none() {
        let html = r#"
            <div class="tide-day">
              <h4 class="tide-day__date">Tide times for tomorrow</h4>
              <table class="tide-day-tides"><tbody>
                <tr><td>High Tide</td><td>02:01</td><td>2.2 m</td></tr>
              </tbody></table>
            </div>
        "#;
        let doc = Html::parse_document(html);
        let sel = Selector::parse(".tide-day").unwrap();
        assert!(extract_day(doc.select(&sel).next().unwrap()).is_none());
    }

    #[test]
    fn test_extract_day_without_events_is_none() {
        let html = r#"
            <div class="tide-day">
              <h4 class="tide-day__date">Friday 07 November 2025</h4>
              <table class="tide-day-tides"><tbody>
                <tr><td>Sunrise</td><td>07:30</td><td>—</td></tr>
              </tbody></table>
            </div>
        "#;
        let doc = Html::parse_document(html);
        let sel = Selector::parse(".tide-day").unwrap();
        assert!(extract_day(doc.select(&sel).next().unwrap()).is_none());
    }

    #[test]
    fn test_scan_days_document_order_with_skips() {
        let html = r#"
            <html><body>
            <div class="tide-header-today">
              <h3>Wednesday 05 November 2025</h3>
              <table class="tide-day-tides"><tbody>
                <tr><td>High Tide</td><td>04:12</td><td>2.13 m</td></tr>
              </tbody></table>
            </div>
            <div class="tide-day">
              <h4 class="tide-day__date">Thursday 06 November 2025</h4>
              <table class="tide-day-tides"><tbody>
                <tr><td>Sunset</td><td>18:30</td><td>—</td></tr>
              </tbody></table>
            </div>
            <div class="tide-day">
              <h4 class="tide-day__date">Friday 07 November 2025</h4>
              <table class="tide-day-tides"><tbody>
                <tr><td>Low Tide</td><td>09:41</td><td>0.35 m</td></tr>
              </tbody></table>
            </div>
            </body></html>
        "#;
        let days = scan_days(html);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2025, 11, 5).unwrap());
        assert_eq!(days[1].date, NaiveDate::from_ymd_opt(2025, 11, 7).unwrap());
    }

    #[test]
    fn test_scan_days_empty_document() {
        assert!(scan_days("<html><body><p>blocked</p></body></html>").is_empty());
    }

    #[test]
    fn test_scan_days_is_deterministic() {
        let html = r#"
            <div class="tide-day">
              <h4 class="tide-day__date">Thursday 06 November 2025</h4>
              <table class="tide-day-tides"><tbody>
                <tr><td>High Tide</td><td>02:01</td><td>2.2 m</td></tr>
              </tbody></table>
            </div>
        "#;
        let first = scan_days(html);
        let second = scan_days(html);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_row_order_preserved_as_source_order() {
        // the extractor trusts table order, it does not sort
        let html = r#"
            <div class="tide-day">
              <h4 class="tide-day__date">Saturday 08 November 2025</h4>
              <table class="tide-day-tides"><tbody>
                <tr><td>Low Tide</td><td>21:50</td><td>0.5 m</td></tr>
                <tr><td>High Tide</td><td>03:14</td><td>2.6 m</td></tr>
              </tbody></table>
            </div>
        "#;
        let day = first_container(html, ".tide-day");
        assert_eq!(day.tides[0].time, "21:50");
        assert_eq!(day.tides[1].time, "03:14");
    }
}
