//! `casement ease`: sample an easing curve.

use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};
use tabled::{Table, Tabled};

use super::types::EasingArg;
use crate::animation::{EasingType, SpringParams, ease, ease_raw};
use crate::cli::output;
use crate::config::get_config;
use crate::error::{CasementError, CasementResult};

/// Arguments of the `ease` command.
#[derive(Args, Debug)]
pub struct EaseArgs {
    /// Easing curve to sample. Defaults to the configured easing.
    #[arg(long, short, value_enum)]
    pub easing: Option<EasingArg>,

    /// Spring damping ratio, clamped to [0.1, 2.0].
    #[arg(long, value_name = "RATIO")]
    pub damping: Option<f64>,

    /// Spring stiffness, clamped to [10, 500].
    #[arg(long, value_name = "K")]
    pub stiffness: Option<f64>,

    /// Number of evenly spaced samples from t = 0 to t = 1.
    #[arg(long, short = 'n', default_value_t = 11, value_name = "COUNT")]
    pub samples: usize,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

/// One sampled point of a curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EaseSample {
    pub t: f64,
    /// Curve value clamped to [0, 1].
    pub eased: f64,
    /// Curve value as geometric animations see it.
    pub raw: f64,
}

#[derive(Tabled)]
struct SampleRow {
    #[tabled(rename = "t")]
    t: String,
    #[tabled(rename = "Eased")]
    eased: String,
    #[tabled(rename = "Raw")]
    raw: String,
    #[tabled(rename = "Overshoot")]
    overshoot: String,
}

/// Samples `easing` at `count` evenly spaced points.
///
/// # Errors
///
/// Returns an error if fewer than two samples are requested.
#[allow(clippy::cast_precision_loss)]
pub fn sample_curve(easing: EasingType, spring: &SpringParams, count: usize) -> CasementResult<Vec<EaseSample>> {
    if count < 2 {
        return Err(CasementError::InvalidArguments(format!(
            "at least 2 samples are needed, got {count}"
        )));
    }

    let last = (count - 1) as f64;
    Ok((0..count)
        .map(|i| {
            let t = i as f64 / last;
            EaseSample { t, eased: ease(t, easing, spring), raw: ease_raw(t, easing, spring) }
        })
        .collect())
}

/// Executes the `ease` command.
///
/// # Errors
///
/// Returns an error if the sample count is invalid.
pub fn execute(args: &EaseArgs) -> CasementResult<()> {
    let defaults = &get_config().animation;
    let easing = args.easing.map_or(defaults.easing, EasingType::from);
    let spring = SpringParams::new(
        args.damping.unwrap_or(defaults.spring.damping_ratio),
        args.stiffness.unwrap_or(defaults.spring.stiffness),
    );
    let samples = sample_curve(easing, &spring, args.samples)?;

    if args.json {
        output::print_json(&serde_json::json!({
            "easing": easing,
            "spring": spring,
            "samples": samples,
        }));
        return Ok(());
    }

    let rows: Vec<SampleRow> = samples
        .iter()
        .map(|sample| SampleRow {
            t: output::format_number(sample.t, 3),
            eased: output::format_number(sample.eased, 4),
            raw: output::format_number(sample.raw, 4),
            overshoot: output::format_bool(!(0.0..=1.0).contains(&sample.raw)),
        })
        .collect();

    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(0..3)).with(Alignment::right()))
        .with(Modify::new(Columns::last()).with(Alignment::center()))
        .to_string();

    let title = if easing == EasingType::SpringBounce {
        format!("{easing} (ζ = {}, k = {})", spring.damping_ratio, spring.stiffness)
    } else {
        easing.to_string()
    };
    println!("{}", title.bold());
    println!("{table}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_curve_endpoints() {
        for easing in EasingType::ALL {
            let samples = sample_curve(easing, &SpringParams::default(), 5).unwrap();
            assert_eq!(samples.len(), 5);
            assert!(samples[0].eased.abs() < f64::EPSILON, "{easing} at 0");
            assert!((samples[4].eased - 1.0).abs() < f64::EPSILON, "{easing} at 1");
        }
    }

    #[test]
    fn test_sample_curve_spacing() {
        let samples = sample_curve(EasingType::Linear, &SpringParams::default(), 3).unwrap();
        let ts: Vec<f64> = samples.iter().map(|s| s.t).collect();
        assert_eq!(ts, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_sample_curve_reports_overshoot_in_raw() {
        let samples = sample_curve(EasingType::Overshoot, &SpringParams::default(), 11).unwrap();
        assert!(samples.iter().any(|s| s.raw > 1.0));
        assert!(samples.iter().all(|s| (0.0..=1.0).contains(&s.eased)));
    }

    #[test]
    fn test_sample_curve_rejects_single_sample() {
        assert!(sample_curve(EasingType::Linear, &SpringParams::default(), 1).is_err());
    }
}
