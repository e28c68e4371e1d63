//! Derived views over a fetched coin list: search, tabs, sparklines and
//! the number formats the tables use.

use crate::models::CoinSummary;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Case-insensitive substring match on name or symbol. An empty query keeps everything.
pub fn filter_coins<'a>(coins: &'a [CoinSummary], query: &str) -> Vec<&'a CoinSummary> {
    let needle = query.to_lowercase();
    coins
        .iter()
        .filter(|coin| {
            coin.name.to_lowercase().contains(&needle)
                || coin.symbol.to_lowercase().contains(&needle)
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum MarketTab {
    #[default]
    All,
    Trending,
    Gainers,
    Losers,
}

/// Ids listed in a trending payload (`{"coins": [{"item": {"id": ..}}]}`).
/// Anything that does not match that shape is skipped.
pub fn trending_ids(payload: &serde_json::Value) -> Vec<String> {
    payload
        .get("coins")
        .and_then(|c| c.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|entry| entry.pointer("/item/id").and_then(|id| id.as_str()))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Apply a market tab. Gainers and losers only keep coins on their side of zero.
pub fn tab_view<'a>(
    coins: Vec<&'a CoinSummary>,
    tab: MarketTab,
    trending: &[String],
) -> Vec<&'a CoinSummary> {
    match tab {
        MarketTab::All => coins,
        MarketTab::Trending => {
            let ids: HashSet<&str> = trending.iter().map(String::as_str).collect();
            coins.into_iter().filter(|c| ids.contains(c.id.as_str())).collect()
        }
        MarketTab::Gainers => {
            let mut out: Vec<_> = coins
                .into_iter()
                .filter(|c| c.price_change_percentage_24h > 0.0)
                .collect();
            out.sort_by(|a, b| {
                b.price_change_percentage_24h
                    .total_cmp(&a.price_change_percentage_24h)
            });
            out
        }
        MarketTab::Losers => {
            let mut out: Vec<_> = coins
                .into_iter()
                .filter(|c| c.price_change_percentage_24h < 0.0)
                .collect();
            out.sort_by(|a, b| {
                a.price_change_percentage_24h
                    .total_cmp(&b.price_change_percentage_24h)
            });
            out
        }
    }
}

/// Polyline for an inline trend chart, in a `width` x `height` box with y growing downwards.
#[derive(Debug, Clone, PartialEq)]
pub struct SparklinePath {
    pub points: Vec<(f64, f64)>,
    /// Last sample is at or above the first
    pub rising: bool,
}

impl SparklinePath {
    pub fn new(prices: &[f64], width: f64, height: f64) -> Option<Self> {
        let (first, last) = (*prices.first()?, *prices.last()?);

        let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
        let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let range = max - min;
        let steps = prices.len().saturating_sub(1).max(1) as f64;

        let points = prices
            .iter()
            .enumerate()
            .map(|(i, price)| {
                let x = i as f64 / steps * width;
                let y = if range > 0.0 {
                    height - (price - min) / range * height
                } else {
                    height / 2.0
                };
                (x, y)
            })
            .collect();

        Some(Self {
            points,
            rising: last >= first,
        })
    }

    /// `x,y x,y ...` as used by an SVG polyline.
    pub fn to_svg_points(&self) -> String {
        self.points
            .iter()
            .map(|(x, y)| format!("{},{}", x, y))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

pub fn format_change(percent: f64) -> String {
    if percent >= 0.0 {
        format!("+{:.2}%", percent)
    } else {
        format!("{:.2}%", percent)
    }
}

pub fn format_billions(value: f64) -> String {
    format!("${:.2}B", value / 1e9)
}

/// Whole dollars with thousands separators, e.g. `"$1,234,568"`.
pub fn format_whole_usd(value: f64) -> String {
    let digits = format!("{:.0}", value.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if value < 0.0 && digits != "0" { "-" } else { "" };
    format!("{}${}", sign, grouped)
}
