use super::error::EvalError;

/// Display text written for any formula that fails to evaluate.
pub const ERROR_SENTINEL: &str = "ERROR";

/// Format a number for display.
///
/// Whole numbers print without a fractional part; everything else uses the shortest
/// text that reads back as the same value, so results can feed other formulas.
pub fn format_number(n: f64) -> String {
    if !n.is_finite() {
        ERROR_SENTINEL.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{:.0}", n)
    } else {
        n.to_string()
    }
}

/// Format an evaluation outcome as cell display text.
pub fn format_result(result: &Result<f64, EvalError>) -> String {
    match result {
        Ok(n) => format_number(*n),
        Err(_) => ERROR_SENTINEL.to_string(),
    }
}
