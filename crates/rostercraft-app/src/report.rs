// Pass report: what changed on each roster, printable as text or JSON.

use std::fmt;

use serde::Serialize;

use rostercraft_core::league::Tid;

#[derive(Debug, Clone, Serialize)]
pub struct TeamReport {
    pub tid: Tid,
    pub name: String,
    pub ovr: f64,
    pub roster_size: usize,
    pub released: Vec<String>,
    pub signed: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TradeReport {
    pub tid: Tid,
    pub partner: Option<Tid>,
    pub value_change: f64,
    /// The evaluated team comes out ahead.
    pub accepted: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PassReport {
    pub league: String,
    pub sport: String,
    pub season: u16,
    /// Roster violation for a human-controlled team, shown verbatim.
    pub user_message: Option<String>,
    pub teams: Vec<TeamReport>,
    pub trade: Option<TradeReport>,
}

impl PassReport {
    pub fn team(&self, tid: Tid) -> Option<&TeamReport> {
        self.teams.iter().find(|t| t.tid == tid)
    }
}

impl fmt::Display for PassReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({}, {} season)", self.league, self.sport, self.season)?;
        if let Some(msg) = &self.user_message {
            writeln!(f, "\n{msg}")?;
        }

        writeln!(f)?;
        writeln!(f, "{:>4}  {:<28} {:>5} {:>7}", "tid", "team", "ovr", "roster")?;
        for t in &self.teams {
            writeln!(f, "{:>4}  {:<28} {:>5.0} {:>7}", t.tid, t.name, t.ovr, t.roster_size)?;
            if !t.released.is_empty() {
                writeln!(f, "        released: {}", t.released.join(", "))?;
            }
            if !t.signed.is_empty() {
                writeln!(f, "        signed:   {}", t.signed.join(", "))?;
            }
        }

        if let Some(trade) = &self.trade {
            writeln!(f)?;
            let partner = trade
                .partner
                .map_or_else(|| "none".to_string(), |p| p.to_string());
            writeln!(
                f,
                "trade for team {} (partner {}): value change {:+.4} -> {}",
                trade.tid,
                partner,
                trade.value_change,
                if trade.accepted { "accept" } else { "decline" }
            )?;
        }
        Ok(())
    }
}
