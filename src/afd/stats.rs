use super::row::{ClaimRow, Status};

/// Community progress over the whole sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    pub total: usize,
    pub claimed: usize,
    pub submitted: usize,
    pub completed: usize,
}

impl Stats {
    pub fn from_rows(rows: &[ClaimRow]) -> Self {
        let mut stats = Stats {
            total: rows.len(),
            ..Default::default()
        };
        for row in rows {
            let status = row.status();
            if status != Status::Unclaimed {
                stats.claimed += 1;
            }
            if matches!(
                status,
                Status::Submitted | Status::CorrectionPending | Status::Completed
            ) {
                stats.submitted += 1;
            }
            if status == Status::Completed {
                stats.completed += 1;
            }
        }
        stats
    }
}

const BAR_EMPTY: &str = "⬜";
// Colour of the filled part by how far along it is
const BAR_STAGES: [(f64, &str); 3] = [(0.3, "🟧"), (0.7, "🟨"), (1.0, "🟩")];

/// Ten-cell emoji progress bar
pub fn progress_bar(value: usize, max: usize) -> String {
    const LENGTH: usize = 10;

    let filled = if max == 0 {
        0
    } else {
        ((LENGTH * value) as f64 / max as f64).round_ties_even() as usize
    }
    .min(LENGTH);

    let fraction = filled as f64 / LENGTH as f64;
    let cell = BAR_STAGES
        .iter()
        .find(|(stage, _)| fraction <= *stage)
        .map(|(_, cell)| *cell)
        .unwrap_or(BAR_EMPTY);

    let mut bar = cell.repeat(filled);
    bar.push_str(&BAR_EMPTY.repeat(LENGTH - filled));
    bar
}
