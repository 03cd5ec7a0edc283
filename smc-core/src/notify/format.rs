//! Plain-text rendering of signals for chat delivery and the terminal.
//!
//! Renderers take the timestamp to print as an argument so output is
//! deterministic. Prices are rounded to two decimals here and nowhere else.

use chrono::{DateTime, Utc};

use crate::domain::{Grade, Side, Signal, Trend};

const RULE: &str = "========================================";
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S UTC";

/// Joins lines with a trailing newline after the last one.
fn block(lines: &[String]) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

/// Single-signal card.
pub fn format_signal(signal: &Signal, symbol: &str, at: DateTime<Utc>) -> String {
    let trend = signal.trend.as_str().to_uppercase();
    block(&[
        format!("SMC SIGNAL | {symbol}"),
        RULE.to_string(),
        format!("Side:        {}", signal.side),
        format!("Trend:       {trend} ({:.0}%)", signal.trend_strength * 100.0),
        format!("Confidence:  {} grade", signal.confidence),
        format!("Source:      {} ({})", signal.zone_source, signal.dedup_id),
        RULE.to_string(),
        format!("Entry:       {:.2}", signal.entry_price()),
        format!("Stop loss:   {:.2}  (risk {:.2})", signal.stop_loss, signal.risk()),
        format!("Take profit: {:.2}  (reward {:.2})", signal.take_profit, signal.reward()),
        format!("Risk/reward: 1:{:.2}", signal.risk_reward),
        RULE.to_string(),
        format!("Zone:        {}", signal.zone_type.as_str().to_uppercase()),
        format!("Strength:    {:.0}%", signal.zone_strength * 100.0),
        format!("Session:     {}", signal.session),
        format!("Time:        {}", at.format(TIME_FORMAT)),
    ])
}

/// Many signals in one message, grouped A, B, C.
pub fn format_digest(signals: &[(String, Signal)], at: DateTime<Utc>) -> String {
    if signals.is_empty() {
        return "No trading signals at this time".to_string();
    }

    let mut lines = vec![
        "MARKET ANALYSIS SUMMARY".to_string(),
        RULE.to_string(),
        format!("Generated: {}", at.format(TIME_FORMAT)),
        format!("Signals:   {}", signals.len()),
    ];

    for grade in [Grade::A, Grade::B, Grade::C] {
        let group: Vec<_> = signals.iter().filter(|(_, s)| s.confidence == grade).collect();
        if group.is_empty() {
            continue;
        }
        lines.push(String::new());
        lines.push(format!("GRADE {grade} ({})", group.len()));
        lines.push("-".repeat(RULE.len()));
        lines.extend(group.into_iter().map(|(symbol, signal)| {
            format!("{symbol:10} | {:4} | RR 1:{:.2}", signal.side.as_str(), signal.risk_reward)
        }));
    }
    block(&lines)
}

/// Aggregate counts and risk/reward figures over a batch of signals.
pub fn format_summary_stats(signals: &[Signal], at: DateTime<Utc>) -> String {
    if signals.is_empty() {
        return "No signals to analyze".to_string();
    }

    let count = |pred: &dyn Fn(&Signal) -> bool| signals.iter().filter(|s| pred(s)).count();
    let rr = signals.iter().map(|s| s.risk_reward);
    let average = rr.clone().sum::<f64>() / signals.len() as f64;
    let best = rr.clone().fold(f64::NEG_INFINITY, f64::max);
    let worst = rr.fold(f64::INFINITY, f64::min);

    block(&[
        "MARKET SUMMARY STATISTICS".to_string(),
        RULE.to_string(),
        format!("Total:    {}", signals.len()),
        format!("BUY:      {}", count(&|s| s.side == Side::Buy)),
        format!("SELL:     {}", count(&|s| s.side == Side::Sell)),
        format!("Bullish:  {}", count(&|s| s.trend == Trend::Bullish)),
        format!("Bearish:  {}", count(&|s| s.trend == Trend::Bearish)),
        format!("Grade A:  {}", count(&|s| s.confidence == Grade::A)),
        format!("Grade B:  {}", count(&|s| s.confidence == Grade::B)),
        format!("Grade C:  {}", count(&|s| s.confidence == Grade::C)),
        format!("Avg R:R:  1:{average:.2}"),
        format!("Best R:R: 1:{best:.2}"),
        format!("Worst R:R: 1:{worst:.2}"),
        format!("Generated: {}", at.format(TIME_FORMAT)),
    ])
}
