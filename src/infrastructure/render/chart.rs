use crate::domain::entities::AnimeRecord;

const BAR_WIDTH: usize = 40;

/// Terminal top-K renderer: one line per record with a proportional bar and
/// the score to three decimals.
pub struct ChartRenderer {
    top_k: usize,
}

impl ChartRenderer {
    pub fn new(top_k: usize) -> Self {
        Self { top_k }
    }

    pub fn render(&self, scored: &[(AnimeRecord, f64)], title: &str) {
        let lines = self.lines(scored, title);
        for line in lines {
            println!("{}", line);
        }
    }

    /// The rendered lines, separated from printing so they can be asserted.
    fn lines(&self, scored: &[(AnimeRecord, f64)], title: &str) -> Vec<String> {
        if scored.is_empty() {
            return vec!["Nothing to render.".to_string()];
        }

        let mut sorted: Vec<&(AnimeRecord, f64)> = scored.iter().collect();
        sorted.sort_by(|a, b| b.1.total_cmp(&a.1));
        sorted.truncate(self.top_k);

        let label_width = sorted
            .iter()
            .map(|(record, _)| Self::label(record).chars().count())
            .max()
            .unwrap_or(0);

        let mut lines = Vec::with_capacity(sorted.len() + 1);
        lines.push(title.to_string());
        for (record, score) in sorted {
            let label = Self::label(record);
            let padding = " ".repeat(label_width - label.chars().count());
            lines.push(format!(
                "{}{}  {} {:.3}",
                label,
                padding,
                bar(*score),
                score
            ));
        }
        lines
    }

    fn label(record: &AnimeRecord) -> String {
        match record.year {
            Some(year) => format!("{} ({})", record.title, year),
            None => format!("{} (-)", record.title),
        }
    }
}

/// Proportional bar on the 0-10 score scale.
fn bar(score: f64) -> String {
    let filled = ((score / 10.0).clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize;
    "█".repeat(filled)
}
