/// Capability the prompt loop uses for "did you mean" lookups. The analysis
/// core does not depend on this.
pub trait SymbolSuggester {
    fn suggest(&self, name: &str, candidates: &[&str]) -> Option<String>;
}

/// Picks the candidate with the highest similarity ratio, ignoring anything
/// below the cutoff. Ratio is `2 * lcs / (len_a + len_b)` over characters,
/// 1.0 for identical strings.
pub struct CloseMatchSuggester {
    pub cutoff: f64,
}

impl Default for CloseMatchSuggester {
    fn default() -> Self {
        Self { cutoff: 0.6 }
    }
}

impl SymbolSuggester for CloseMatchSuggester {
    fn suggest(&self, name: &str, candidates: &[&str]) -> Option<String> {
        let mut best: Option<(&str, f64)> = None;

        for &candidate in candidates {
            let score = similarity(name, candidate);
            if score < self.cutoff {
                continue;
            }
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((candidate, score));
            }
        }

        best.map(|(candidate, _)| candidate.to_owned())
    }
}

fn similarity(a: &str, b: &str) -> f64 {
    let a = a.chars().collect::<Vec<_>>();
    let b = b.chars().collect::<Vec<_>>();
    if a.is_empty() && b.is_empty() {
        return 1.0;
    }

    // longest common subsequence, one row at a time
    let mut prev = vec![0usize; b.len() + 1];
    let mut row = vec![0usize; b.len() + 1];

    for &ca in &a {
        for (j, &cb) in b.iter().enumerate() {
            row[j + 1] = if ca == cb {
                prev[j] + 1
            } else {
                row[j].max(prev[j + 1])
            };
        }
        std::mem::swap(&mut prev, &mut row);
    }

    2.0 * prev[b.len()] as f64 / (a.len() + b.len()) as f64
}
