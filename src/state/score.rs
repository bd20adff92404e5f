use crate::types::Score;

impl Score {
    /// Record one accepted guess
    pub fn record(&mut self, correct: bool) {
        self.total += 1;
        if correct {
            self.correct += 1;
        }
    }

    /// Accuracy as a percentage with one decimal, "0.0" before the first guess
    pub fn accuracy(&self) -> String {
        if self.total == 0 {
            return "0.0".to_string();
        }
        let pct = f64::from(self.correct) / f64::from(self.total) * 100.0;
        format!("{:.1}", pct)
    }
}
