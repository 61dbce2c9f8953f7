use inquire::InquireError;
use meteo_core::{Alert, MeteoView, Region, Severity, WeatherDay};
use tracing::warn;

/// [`MeteoView`] that talks to the terminal.
#[derive(Debug, Clone, Copy)]
pub struct TerminalView {
    /// Answer "yes" to every confirmation without prompting.
    pub assume_yes: bool,
}

impl MeteoView for TerminalView {
    fn alert(&self, alert: &Alert) {
        match alert.severity {
            Severity::Info => println!("{}", alert.message),
            Severity::Warning => eprintln!("warning: {}: {}", alert.title, alert.message),
            Severity::Error => eprintln!("error: {}: {}", alert.title, alert.message),
        }
    }

    fn confirm(&self, question: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        answer_or_decline(inquire::Confirm::new(question).with_default(false).prompt())
    }
}

/// A prompt that fails (no TTY, Ctrl-C, I/O error) counts as "no".
fn answer_or_decline(answer: Result<bool, InquireError>) -> bool {
    match answer {
        Ok(answer) => answer,
        Err(e) => {
            warn!(error = %e, "confirmation prompt failed; treating as declined");
            false
        }
    }
}

pub fn print_regions(regions: &[Region]) {
    if regions.is_empty() {
        println!("No regions stored.");
        return;
    }

    let width = regions.iter().map(|r| r.name.chars().count()).max().unwrap_or(0).max(4);
    println!("{:>4}  {:<width$}  {:>10}  {:>11}", "ID", "NAME", "LATITUDE", "LONGITUDE");
    for r in regions {
        let marker = if r.is_seed() { " (default)" } else { "" };
        println!(
            "{:>4}  {:<width$}  {:>10.4}  {:>11.4}{marker}",
            r.id, r.name, r.latitude, r.longitude
        );
    }
}

pub fn print_forecast(region: &Region, days: &[WeatherDay]) {
    println!(
        "Forecast for {} ({:.4}, {:.4})",
        region.name, region.latitude, region.longitude
    );

    for day in days {
        println!(
            "  {}  {:>5.1}°C  ({:>5.1} / {:>5.1})  {:>3}% precip {:>5.1} mm  wind {:>4.1} m/s {:<3}  {}",
            day.date.format("%a %Y-%m-%d"),
            day.temperature_c,
            day.min_temperature_c,
            day.max_temperature_c,
            day.precipitation_probability_pct,
            day.precipitation_mm,
            day.wind_speed_mps,
            day.wind_direction,
            day.description,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assume_yes_confirms_without_prompting() {
        let view = TerminalView { assume_yes: true };
        assert!(view.confirm("Delete region 'Laval'?"));
    }

    #[test]
    fn prompt_answers_pass_through() {
        assert!(answer_or_decline(Ok(true)));
        assert!(!answer_or_decline(Ok(false)));
    }

    #[test]
    fn failed_prompt_is_a_decline() {
        assert!(!answer_or_decline(Err(InquireError::NotTTY)));
        assert!(!answer_or_decline(Err(InquireError::OperationCanceled)));
    }
}
