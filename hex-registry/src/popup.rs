use crate::breakdown::HexCell;
use campaign_core::aggregates::party_support_score;
use std::fmt::Write;

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

pub fn support_popup_html(cell: &HexCell) -> String {
    let mut html = format!(
        "<div class=\"hex-popup\"><strong>{} voters</strong>",
        cell.voter_count
    );
    if cell.levels.is_empty() {
        html.push_str("<p>No assessments</p></div>");
        return html;
    }
    html.push_str("<ul>");
    for lc in &cell.levels {
        let _ = write!(
            html,
            "<li><span class=\"swatch\" style=\"background:{}\"></span>{}: {}</li>",
            lc.support_level.color(),
            lc.support_level.label(),
            lc.voter_count
        );
    }
    html.push_str("</ul></div>");
    html
}

pub fn party_popup_html(cell: &HexCell) -> String {
    let mut html = format!(
        "<div class=\"hex-popup\"><strong>{} voters</strong>",
        cell.voter_count
    );
    if cell.parties.is_empty() {
        html.push_str("<p>No party data</p></div>");
        return html;
    }
    html.push_str("<ul>");
    for party in &cell.parties {
        let _ = write!(html, "<li>{}: {}", escape_html(&party.party_name), party.voter_count);
        if !party.levels.is_empty() {
            let _ = write!(html, " (score {:.2})", party_support_score(&party.levels));
        }
        html.push_str("</li>");
    }
    html.push_str("</ul></div>");
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breakdown::PartyCount;
    use campaign_core::models::LevelCount;
    use campaign_core::SupportLevel;

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html("<b>\"A&B\"</b>"), "&lt;b&gt;&quot;A&amp;B&quot;&lt;/b&gt;");
    }

    #[test]
    fn party_popup_escapes_names_and_scores() {
        let cell = HexCell {
            hex_id: "h".into(),
            voter_count: 3,
            levels: vec![],
            parties: vec![PartyCount {
                party_id: "p1".into(),
                party_name: "<Blue>".into(),
                color: None,
                voter_count: 3,
                levels: vec![
                    LevelCount { support_level: SupportLevel::StrongSupporter, voter_count: 2 },
                    LevelCount { support_level: SupportLevel::Undecided, voter_count: 1 },
                ],
            }],
        };
        let html = party_popup_html(&cell);
        assert!(html.contains("&lt;Blue&gt;: 3 (score 1.33)"));
        assert!(html.starts_with("<div class=\"hex-popup\"><strong>3 voters</strong>"));
    }

    #[test]
    fn empty_support_popup() {
        let cell = HexCell { hex_id: "h".into(), voter_count: 0, levels: vec![], parties: vec![] };
        assert!(support_popup_html(&cell).contains("No assessments"));
    }
}
