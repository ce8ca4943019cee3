//! Output formatting for CLI

use crate::pipeline::{MetricsSummary, TrainingResult};

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a subsection header
pub fn print_subsection(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(40));
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:20} {}", format!("{}:", key), value);
}

/// Print statistics table
pub fn print_stats_table(stats: &[(&str, &str)]) {
    for (key, value) in stats {
        print_kv(key, value);
    }
}

/// Render a history as a bracketed list, e.g. `[0, 2, 5]`
pub fn format_history(values: &[u32]) -> String {
    let items: Vec<String> = values.iter().map(u32::to_string).collect();
    format!("[{}]", items.join(", "))
}

/// Print the end-of-run report: both histories, then a summary table
pub fn print_training_report(result: &TrainingResult, metrics: &MetricsSummary) {
    print_section("Training Results");
    println!(
        "The total number of incurred penalties are {}",
        format_history(&result.penalties)
    );
    println!(
        "The number of unsuccessfull trials {}",
        format_history(&result.deadlines)
    );

    print_subsection("Summary");
    let trials = result.total_trials.to_string();
    let successes = result.successes.to_string();
    let success_rate = format!("{:.1}%", result.success_rate * 100.0);
    let recent = format!("{:.1}%", metrics.recent_success_rate * 100.0);
    let avg_steps = format!("{:.1}", metrics.avg_steps);
    let avg_reward = format!("{:.2}", metrics.avg_net_reward);
    let penalty_rate = format!("{:.1}%", metrics.penalty_rate * 100.0);
    let counters = format!("{:?}", result.counter_mode);
    let q_values = result.q_table_size.to_string();
    print_stats_table(&[
        ("Trials", trials.as_str()),
        ("Reached destination", successes.as_str()),
        ("Success rate", success_rate.as_str()),
        ("Recent success rate", recent.as_str()),
        ("Avg steps", avg_steps.as_str()),
        ("Avg net reward", avg_reward.as_str()),
        ("Penalty step rate", penalty_rate.as_str()),
        ("Counter mode", counters.as_str()),
        ("Q-values learned", q_values.as_str()),
    ]);
}
