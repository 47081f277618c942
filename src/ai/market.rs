use crate::types::ChatTurn;
use serde::{Deserialize, Serialize};

/// Prepended to chats sent with the market research flag.
pub const MARKET_RESEARCH_INSTRUCTION: &str = "このメッセージは市場調査を目的としています。ユーザーの入力に基づいて、市場の現状、競合分析、機会と課題について分析してください。";

/// Shown when a provider answers with no content.
pub const EMPTY_REPLY: &str = "すみません、応答を生成できませんでした。";

pub fn with_market_research(mut turns: Vec<ChatTurn>) -> Vec<ChatTurn> {
    turns.insert(0, ChatTurn::system(MARKET_RESEARCH_INSTRUCTION));
    turns
}

/// The standalone research instruction, asking for four blank-line separated
/// sections.
pub fn research_prompt(query: &str) -> String {
    format!(
        "以下のクエリについて、市場調査を行ってください。以下の4つのカテゴリーに分けて分析してください：\n\
         1. 市場規模：現在の市場規模、成長率、主要な市場セグメント\n\
         2. 競合分析：主要な競合企業、市場シェア、競争力\n\
         3. 機会：新規参入の機会、成長の可能性、未開拓の市場\n\
         4. 課題：市場参入の障壁、リスク、克服すべき課題\n\n\
         クエリ: {query}"
    )
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketReport {
    pub market_size: String,
    pub competitors: String,
    pub opportunities: String,
    pub challenges: String,
}

impl MarketReport {
    /// Sections are taken positionally from blank-line separated blocks.
    /// Missing sections stay empty; anything past the fourth is dropped.
    pub fn from_reply(reply: &str) -> Self {
        let normalized = reply.replace("\r\n", "\n");
        let mut sections = normalized.split("\n\n").map(str::to_string);
        Self {
            market_size: sections.next().unwrap_or_default(),
            competitors: sections.next().unwrap_or_default(),
            opportunities: sections.next().unwrap_or_default(),
            challenges: sections.next().unwrap_or_default(),
        }
    }
}

/// The report for the most recent research request. Every request takes a
/// new ticket, and a report delivered against an older ticket is dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportSlot {
    ticket: u64,
    report: Option<MarketReport>,
}

impl ReportSlot {
    /// Clear the current report and return the ticket for the new request.
    pub fn request(&mut self) -> u64 {
        self.ticket += 1;
        self.report = None;
        self.ticket
    }

    /// Store `report` if `ticket` is still the latest request.
    pub fn fill(&mut self, ticket: u64, report: MarketReport) -> bool {
        if ticket != self.ticket {
            tracing::debug!(ticket, latest = self.ticket, "dropping stale market report");
            return false;
        }
        self.report = Some(report);
        true
    }

    pub fn report(&self) -> Option<&MarketReport> {
        self.report.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_sections_map_in_order() {
        let report = MarketReport::from_reply("A\n\nB\n\nC\n\nD");
        assert_eq!(
            report,
            MarketReport {
                market_size: "A".into(),
                competitors: "B".into(),
                opportunities: "C".into(),
                challenges: "D".into(),
            }
        );
    }

    #[test]
    fn short_reply_leaves_trailing_sections_empty() {
        let report = MarketReport::from_reply("only one");
        assert_eq!(report.market_size, "only one");
        assert!(report.competitors.is_empty());
        assert!(report.challenges.is_empty());
    }

    #[test]
    fn extra_sections_are_ignored() {
        let report = MarketReport::from_reply("1\n\n2\n\n3\n\n4\n\n5");
        assert_eq!(report.challenges, "4");
    }

    #[test]
    fn windows_line_endings_still_split() {
        let report = MarketReport::from_reply("A\r\n\r\nB");
        assert_eq!(report.competitors, "B");
    }

    #[test]
    fn report_serializes_camel_case() {
        let json = serde_json::to_value(MarketReport::from_reply("A")).unwrap();
        assert_eq!(json["marketSize"], "A");
        assert_eq!(json["opportunities"], "");
    }

    #[test]
    fn prompt_ends_with_query() {
        let prompt = research_prompt("農業ドローン");
        assert!(prompt.starts_with("以下のクエリについて"));
        assert!(prompt.contains("4. 課題"));
        assert!(prompt.ends_with("クエリ: 農業ドローン"));
    }

    #[test]
    fn late_report_from_an_earlier_request_is_dropped() {
        let mut slot = ReportSlot::default();
        let first = slot.request();
        let second = slot.request();

        let stale = MarketReport::from_reply("old");
        assert!(!slot.fill(first, stale));
        assert!(slot.report().is_none());

        let fresh = MarketReport::from_reply("new");
        assert!(slot.fill(second, fresh.clone()));
        assert_eq!(slot.report(), Some(&fresh));
    }

    #[test]
    fn a_new_request_clears_the_previous_report() {
        let mut slot = ReportSlot::default();
        let ticket = slot.request();
        slot.fill(ticket, MarketReport::from_reply("A"));
        slot.request();
        assert!(slot.report().is_none());
    }
}
