//! Column means over the per-trial best results.

use er_trial::DispatchResult;

/// Means over a set of results.  Unrounded.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub count:          usize,
    pub forward_time:   f64,
    pub backward_time:  f64,
    pub total_cost:     f64,
    /// Mean over the results that carry a risk; `None` if none do.
    pub total_risk:     Option<f64>,
    pub score:          f64,
    pub total_time_min: f64,
    pub path_length:    f64,
}

/// Summarise `results`.  Returns `None` for an empty slice.
pub fn summarize(results: &[DispatchResult]) -> Option<Summary> {
    if results.is_empty() {
        return None;
    }
    let n = results.len() as f64;
    let mean = |f: fn(&DispatchResult) -> f64| results.iter().map(f).sum::<f64>() / n;

    let risks: Vec<f64> = results.iter().filter_map(|r| r.total_risk).collect();
    let total_risk = (!risks.is_empty()).then(|| risks.iter().sum::<f64>() / risks.len() as f64);

    Some(Summary {
        count:          results.len(),
        forward_time:   mean(|r| r.forward_time),
        backward_time:  mean(|r| r.backward_time),
        total_cost:     mean(|r| r.total_cost),
        total_risk,
        score:          mean(|r| r.score),
        total_time_min: mean(|r| r.total_time_min),
        path_length:    mean(|r| r.path_length() as f64),
    })
}

impl Summary {
    /// One line per column, for the end-of-run log.
    pub fn log(&self) {
        log::info!("averages over {} best results:", self.count);
        log::info!("  forward time   {:.2}", self.forward_time);
        log::info!("  backward time  {:.2}", self.backward_time);
        log::info!("  total cost     {:.2}", self.total_cost);
        if let Some(risk) = self.total_risk {
            log::info!("  total risk     {risk:.2}");
            log::info!("  score          {:.2}", self.score);
        }
        log::info!("  total minutes  {:.2}", self.total_time_min);
        log::info!("  path nodes     {:.2}", self.path_length);
    }
}
