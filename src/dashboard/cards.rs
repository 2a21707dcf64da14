//! The four summary cards shown above the map.

use maud::{Markup, html};

use crate::{
    dashboard::stats::TransactionStats,
    html::{format_count, format_currency},
};

/// The colour theme of a card's icon and badge.
#[derive(Debug, Clone, Copy)]
enum CardTone {
    Blue,
    Red,
    Green,
    Yellow,
}

impl CardTone {
    fn badge_style(self) -> &'static str {
        match self {
            CardTone::Blue => "px-3 py-1 rounded-full text-sm bg-blue-100 text-blue-700 dark:bg-blue-500/10 dark:text-blue-400",
            CardTone::Red => "px-3 py-1 rounded-full text-sm bg-red-100 text-red-700 dark:bg-red-500/10 dark:text-red-400",
            CardTone::Green => "px-3 py-1 rounded-full text-sm bg-green-100 text-green-700 dark:bg-green-500/10 dark:text-green-400",
            CardTone::Yellow => "px-3 py-1 rounded-full text-sm bg-yellow-100 text-yellow-700 dark:bg-yellow-500/10 dark:text-yellow-400",
        }
    }

    fn accent_style(self) -> &'static str {
        match self {
            CardTone::Blue => "border-t-4 border-blue-500",
            CardTone::Red => "border-t-4 border-red-500",
            CardTone::Green => "border-t-4 border-green-500",
            CardTone::Yellow => "border-t-4 border-yellow-500",
        }
    }
}

struct StatCard<'a> {
    label: &'a str,
    value: String,
    badge: Option<String>,
    tone: CardTone,
}

fn stat_card(card: StatCard) -> Markup {
    html! {
        div
            class={ "bg-white dark:bg-gray-800 rounded-lg p-6 shadow-md " (card.tone.accent_style()) }
            data-stat-card=(card.label)
        {
            div class="flex items-center justify-between"
            {
                p class="text-sm text-gray-600 dark:text-gray-400" { (card.label) }

                @if let Some(badge) = card.badge {
                    span class=(card.tone.badge_style()) { (badge) }
                }
            }

            h3 class="text-2xl font-bold mt-4" { (card.value) }
        }
    }
}

/// Renders the grid of summary cards.
pub(super) fn stats_cards_view(stats: &TransactionStats) -> Markup {
    let cards = [
        StatCard {
            label: "Total Volume",
            value: format_currency(stats.total_volume),
            badge: None,
            tone: CardTone::Blue,
        },
        StatCard {
            label: "Fraud Amount",
            value: format_currency(stats.fraud_amount),
            badge: Some(format!("{}%", stats.fraud_percentage_label())),
            tone: CardTone::Red,
        },
        StatCard {
            label: "Total Transactions",
            value: format_count(stats.total_count),
            badge: Some("Protected".to_owned()),
            tone: CardTone::Green,
        },
        StatCard {
            label: "Fraud Cases",
            value: format_count(stats.fraud_count),
            badge: Some("Alert".to_owned()),
            tone: CardTone::Yellow,
        },
    ];

    html! {
        section id="stats" class="w-full mb-8"
        {
            div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-4 gap-6"
            {
                @for card in cards {
                    (stat_card(card))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use crate::dashboard::stats::TransactionStats;

    use super::stats_cards_view;

    fn card_text(fragment: &Html, label: &str) -> (String, Option<String>) {
        let card_selector = Selector::parse(&format!("[data-stat-card=\"{label}\"]")).unwrap();
        let card = fragment
            .select(&card_selector)
            .next()
            .unwrap_or_else(|| panic!("no card for {label}"));
        let value = card
            .select(&Selector::parse("h3").unwrap())
            .next()
            .unwrap()
            .text()
            .collect::<String>();
        let badge = card
            .select(&Selector::parse("span").unwrap())
            .next()
            .map(|badge| badge.text().collect::<String>());

        (value, badge)
    }

    #[test]
    fn renders_four_cards() {
        let stats = TransactionStats {
            total_volume: 1234.5,
            fraud_amount: 200.0,
            total_count: 1500,
            fraud_count: 3,
            fraud_percentage: 0.2,
        };

        let fragment = Html::parse_fragment(&stats_cards_view(&stats).into_string());

        assert_eq!(card_text(&fragment, "Total Volume"), ("$1,234.50".to_owned(), None));
        assert_eq!(
            card_text(&fragment, "Fraud Amount"),
            ("$200.00".to_owned(), Some("0.2%".to_owned()))
        );
        assert_eq!(
            card_text(&fragment, "Total Transactions"),
            ("1,500".to_owned(), Some("Protected".to_owned()))
        );
        assert_eq!(
            card_text(&fragment, "Fraud Cases"),
            ("3".to_owned(), Some("Alert".to_owned()))
        );
    }
}
