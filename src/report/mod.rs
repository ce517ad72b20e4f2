//! Report generation with multiple output formats
//!
//! Architecture: Anti-Corruption Layer - Formatters translate domain objects to external formats
//! - Tone exchanges, simulation snapshots and agent reports are rendered without touching their logic
//! - Human output is colored only when requested and the colors feature is compiled in
//! - JSON output is the serde representation of the same objects

use crate::agents::{ExecutiveReport, FleetStatus, RoiReport};
use crate::consciousness::ConsciousnessSnapshot;
use crate::domain::{ShowcaseError, ShowcaseResult};
use crate::reasoning::ReasoningRun;
use crate::showcase::Demo;
use crate::store::StoreStatistics;
use crate::tone::{Exchange, ToneStatus};
use serde::Serialize;
use std::fmt::Write as _;
use std::io::Write;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Human,
    /// JSON for programmatic consumption
    Json,
}

impl OutputFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "human" | "text" => Some(Self::Human),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    pub fn all_formats() -> &'static [&'static str] {
        &["human", "json"]
    }
}

/// Options for customizing report output
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Whether to use colored output (for human format)
    pub use_colors: bool,
    /// Include the context analysis with each tone exchange
    pub show_context: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            use_colors: true,
            show_context: false,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Style {
    Heading,
    Good,
    Warn,
    Dim,
}

/// Renders showcase results for the terminal or for machines
#[derive(Debug, Clone, Default)]
pub struct ReportFormatter {
    options: ReportOptions,
}

impl ReportFormatter {
    pub fn new(options: ReportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ReportOptions {
        &self.options
    }

    #[cfg(feature = "colors")]
    fn paint(&self, text: &str, style: Style) -> String {
        use colored::Colorize;
        if !self.options.use_colors {
            return text.to_string();
        }
        match style {
            Style::Heading => text.bold().cyan().to_string(),
            Style::Good => text.green().to_string(),
            Style::Warn => text.yellow().to_string(),
            Style::Dim => text.dimmed().to_string(),
        }
    }

    #[cfg(not(feature = "colors"))]
    fn paint(&self, text: &str, _style: Style) -> String {
        text.to_string()
    }

    fn json<T: Serialize + ?Sized>(value: &T) -> ShowcaseResult<String> {
        Ok(serde_json::to_string_pretty(value)?)
    }

    /// Format one tone exchange; `debug` adds the context analysis
    pub fn format_exchange(&self, exchange: &Exchange, format: OutputFormat, debug: bool) -> ShowcaseResult<String> {
        if format == OutputFormat::Json {
            return Self::json(exchange);
        }

        let mut out = String::new();
        if let Some(transition) = exchange.transition {
            let _ = writeln!(
                out,
                "{}",
                self.paint(&format!("🔄 Tone shift: {} → {}", transition.from, transition.to), Style::Warn)
            );
        }

        if debug || self.options.show_context {
            let ctx = &exchange.context;
            let _ = writeln!(out, "{}", self.paint("📊 Context Analysis:", Style::Dim));
            let _ = writeln!(out, "   Formality: {:.2}", ctx.formality);
            let _ = writeln!(out, "   Emotion: {}", ctx.emotion.as_str());
            let _ = writeln!(out, "   Technical: {:.2}", ctx.technical);
            let _ = writeln!(out, "   Creative: {:.2}", ctx.creative);
        }

        let _ = writeln!(out, "{} {}", self.paint(&format!("[{}]", exchange.layer), Style::Heading), exchange.response);
        Ok(out)
    }

    pub fn format_tone_status(&self, status: &ToneStatus, format: OutputFormat) -> ShowcaseResult<String> {
        if format == OutputFormat::Json {
            return Self::json(status);
        }
        Ok(format!(
            "📊 Current Status:\n   Tone Layer: {}\n   Emotional State: {}\n   Interactions: {}\n",
            status.current_layer,
            status.emotional_state.as_str(),
            status.interactions
        ))
    }

    /// One line per simulation step
    pub fn format_consciousness(
        &self,
        step: usize,
        snapshot: &ConsciousnessSnapshot,
        format: OutputFormat,
    ) -> ShowcaseResult<String> {
        if format == OutputFormat::Json {
            return Ok(serde_json::to_string(snapshot)?);
        }
        Ok(format!(
            "{} {} ({:.2}) attention {:.2} energy {:.2} memory {:.2}\n",
            self.paint(&format!("Step {step:>3}:"), Style::Dim),
            snapshot.state,
            snapshot.intensity,
            snapshot.attention_focus,
            snapshot.energy_level,
            snapshot.memory_consolidation
        ))
    }

    pub fn format_reasoning(&self, run: &ReasoningRun, format: OutputFormat) -> ShowcaseResult<String> {
        if format == OutputFormat::Json {
            return Self::json(run);
        }

        let mut out = String::new();
        let _ = writeln!(out, "{}", self.paint(&format!("🔮 Problem: {}", run.problem), Style::Heading));

        let _ = writeln!(out, "\nEntanglement scores:");
        for (name, score) in &run.scores {
            let _ = writeln!(out, "   {:<20} {:.3}", name, score);
        }

        for step in &run.steps {
            let _ = writeln!(out, "\n{}:", step.label);
            for (name, probability) in &step.distribution {
                let _ = writeln!(
                    out,
                    "   {:<20} {:>6.1}% {}",
                    name,
                    probability * 100.0,
                    "█".repeat((probability * 40.0).round() as usize)
                );
            }
        }

        let _ = writeln!(
            out,
            "\n{} {} (p={:.3})",
            self.paint("✨ Collapsed to:", Style::Good),
            run.collapse.chosen,
            run.collapse.probability
        );
        Ok(out)
    }

    pub fn format_fleet_status(&self, status: &FleetStatus, format: OutputFormat) -> ShowcaseResult<String> {
        if format == OutputFormat::Json {
            return Self::json(status);
        }

        let mut out = String::new();
        let _ = writeln!(out, "{}", self.paint("🤖 Fleet Status", Style::Heading));
        let _ = writeln!(out, "   Agents: {}", status.total_agents);
        for (kind, count) in &status.agents_by_kind {
            let _ = writeln!(out, "     {}: {}", kind.display_name(), count);
        }
        let _ = writeln!(out, "   Tasks completed: {}", status.total_tasks_completed);
        let _ = writeln!(out, "   Value generated: {}", money(status.total_value_generated));

        if !status.agents.is_empty() {
            let _ = writeln!(out);
            for agent in &status.agents {
                let _ = writeln!(
                    out,
                    "   {:<12} {:<14} tasks {:>4}  failed {:>2}  pending {:>2}  goals {:>2}  value {}",
                    agent.agent_id,
                    agent.state.as_str(),
                    agent.tasks_completed,
                    agent.tasks_failed,
                    agent.tasks_pending,
                    agent.goals_active,
                    money(agent.value_generated)
                );
            }
        }
        Ok(out)
    }

    pub fn format_roi(&self, roi: &RoiReport, format: OutputFormat) -> ShowcaseResult<String> {
        if format == OutputFormat::Json {
            return Self::json(roi);
        }

        let mut out = String::new();
        let _ = writeln!(out, "{}", self.paint("🎯 ROI Analysis:", Style::Heading));
        let _ = writeln!(out, "Value Generated: {}", money(roi.total_value_generated));
        let _ = writeln!(out, "Monthly Cost: {}", money(roi.monthly_cost));
        let _ = writeln!(out, "Net Value: {}", money(roi.net_value));

        let roi_line = format!("ROI: {:.1}%", roi.roi_percentage);
        let style = if roi.roi_percentage > 0.0 { Style::Good } else { Style::Warn };
        let _ = writeln!(out, "{}", self.paint(&roi_line, style));

        match roi.payback_period_days {
            Some(days) => {
                let _ = writeln!(out, "Payback Period: {:.1} days", days);
            }
            None => {
                let _ = writeln!(out, "Payback Period: n/a (no value generated yet)");
            }
        }
        let _ = writeln!(
            out,
            "Agents: {}  Tasks: {}  Decisions: {}  Autonomous hours: {:.2}",
            roi.agents_deployed, roi.tasks_completed, roi.decisions_made, roi.autonomous_hours
        );
        Ok(out)
    }

    pub fn format_executive_report(&self, report: &ExecutiveReport, format: OutputFormat) -> ShowcaseResult<String> {
        if format == OutputFormat::Json {
            return Self::json(report);
        }

        let summary = &report.executive_summary;
        let impact = &report.business_impact;
        let mut out = String::new();

        let _ = writeln!(out, "{}", self.paint("📈 Executive Report", Style::Heading));
        let _ = writeln!(out, "   Generated: {}", report.timestamp.format("%Y-%m-%d %H:%M:%S UTC"));
        let _ = writeln!(out, "   Agents active: {}", summary.agents_active);
        let _ = writeln!(out, "   Value generated: {}", money(summary.total_value_generated));
        let _ = writeln!(out, "   ROI: {:.1}%", summary.roi);
        let _ = writeln!(
            out,
            "   Recommendation: {}",
            self.paint(summary.recommendation.as_str(), Style::Good)
        );

        let _ = writeln!(out, "\n   Business impact:");
        let _ = writeln!(out, "     Productivity gain: {:.1}%", impact.productivity_gain * 100.0);
        let _ = writeln!(out, "     Cost reduction: {:.1}%", impact.cost_reduction * 100.0);
        let _ = writeln!(out, "     Employee satisfaction: {:.1}%", impact.employee_satisfaction * 100.0);
        let _ = writeln!(out, "     Innovation increase: {:.1}%", impact.innovation_increase * 100.0);

        let _ = writeln!(out, "\n   Next steps:");
        for recommendation in &report.future_recommendations {
            let _ = writeln!(out, "     • {}", recommendation);
        }

        let _ = writeln!(out);
        out.push_str(&self.format_roi(&report.roi, OutputFormat::Human)?);
        Ok(out)
    }

    pub fn format_demos(&self, demos: &[Demo], format: OutputFormat) -> ShowcaseResult<String> {
        if format == OutputFormat::Json {
            return Self::json(demos);
        }

        let rule = "─".repeat(70);
        let mut out = String::new();
        let _ = writeln!(out, "\n📋 Available Demonstrations:\n");
        let _ = writeln!(out, "{rule}");
        for demo in demos {
            let _ = writeln!(out, "  [{}] {}", demo.id, self.paint(demo.name, Style::Heading));
            let _ = writeln!(out, "      {}", demo.description);
            let _ = writeln!(
                out,
                "      {}",
                self.paint(
                    &format!("Duration: {} | Difficulty: {} | lukhas demo {}", demo.duration, demo.difficulty, demo.slug),
                    Style::Dim
                )
            );
            let _ = writeln!(out);
        }
        let _ = writeln!(out, "{rule}");
        Ok(out)
    }

    pub fn format_store_statistics(&self, stats: &StoreStatistics, format: OutputFormat) -> ShowcaseResult<String> {
        if format == OutputFormat::Json {
            return Self::json(stats);
        }
        Ok(format!("{}\n", stats.format_display()))
    }

    /// Write already formatted output
    pub fn write_output<W: Write>(&self, output: &str, mut writer: W) -> ShowcaseResult<()> {
        writer
            .write_all(output.as_bytes())
            .map_err(|e| ShowcaseError::Io { source: e })?;
        Ok(())
    }
}

/// Dollar amount with thousands separators and cents
pub fn money(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u128;
    let whole = (cents / 100).to_string();

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${grouped}.{:02}", cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::Workforce;
    use crate::config::{ConfigBuilder, ToneConfig};
    use crate::reasoning::{reason, route_planning_example, CollapseMode, ROUTE_PROBLEM};
    use crate::tone::ToneSystem;
    use chrono::Utc;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rstest::rstest;

    fn plain() -> ReportFormatter {
        ReportFormatter::new(ReportOptions {
            use_colors: false,
            ..Default::default()
        })
    }

    #[rstest]
    #[case(0.0, "$0.00")]
    #[case(999.5, "$999.50")]
    #[case(1_234_567.891, "$1,234,567.89")]
    #[case(-102_000.0, "-$102,000.00")]
    fn test_money(#[case] amount: f64, #[case] expected: &str) {
        assert_eq!(money(amount), expected);
    }

    #[test]
    fn test_parse_format() {
        assert_eq!(OutputFormat::parse("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("human"), Some(OutputFormat::Human));
        assert_eq!(OutputFormat::parse("sarif"), None);
    }

    #[test]
    fn test_exchange_formats() {
        let mut tone = ToneSystem::new(&ToneConfig::default()).unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        let exchange = tone.respond("Imagine a creative dream", &mut rng);

        let human = plain().format_exchange(&exchange, OutputFormat::Human, true).unwrap();
        assert!(human.contains("Tone shift: 💬 User Friendly → 🎨 Poetic"));
        assert!(human.contains("Context Analysis"));
        assert!(human.contains("[🎨 Poetic]"));

        let json = plain().format_exchange(&exchange, OutputFormat::Json, false).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["layer"], "poetic");
    }

    #[test]
    fn test_reasoning_report() {
        let (candidates, constraints) = route_planning_example();
        let mut rng = StdRng::seed_from_u64(0);
        let run = reason(ROUTE_PROBLEM, candidates, &constraints, 3, 1.0, CollapseMode::MostProbable, &mut rng).unwrap();

        let human = plain().format_reasoning(&run, OutputFormat::Human).unwrap();
        assert!(human.contains("Entanglement scores"));
        assert!(human.contains(&format!("Collapsed to: {}", run.collapse.chosen)));
    }

    #[test]
    fn test_workforce_reports() {
        let config = ConfigBuilder::new().seed(9).build().unwrap();
        let mut workforce = Workforce::deploy(&config, 100, Utc::now()).unwrap();

        let roi = plain().format_roi(&workforce.calculate_roi(), OutputFormat::Human).unwrap();
        assert!(roi.contains("Payback Period: n/a"));
        assert!(roi.contains("Monthly Cost: $19,000.00"));

        let end = workforce.simulate(10, Utc::now());
        let report = workforce.executive_report(&mut StdRng::seed_from_u64(1), end);
        let human = plain().format_executive_report(&report, OutputFormat::Human).unwrap();
        assert!(human.contains("Recommendation:"));
        assert!(human.contains("Implement predictive hiring with DΛST"));

        let json = plain().format_executive_report(&report, OutputFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(parsed["agent_performance"]["nias_000"].is_object());
    }

    #[test]
    fn test_demo_menu() {
        let menu = plain().format_demos(&crate::showcase::DEMOS, OutputFormat::Human).unwrap();
        assert!(menu.contains("[1] 🎭 Three-Layer Tone System"));
        assert!(menu.contains("Difficulty: Professional"));
    }
}
