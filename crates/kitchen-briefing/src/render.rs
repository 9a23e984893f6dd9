//! Plain-text rendering of runs, briefings and progress events.

use std::fmt::Write;

use briefing_models::{AgentResultRecord, Briefing, BriefingEvent, Run};

/// One progress line per event.
pub fn event_line(event: &BriefingEvent) -> String {
    match event {
        BriefingEvent::PhaseStart { phase, agents } => {
            format!("[{}] started ({})", phase, agents.join(", "))
        }
        BriefingEvent::AgentStart { phase, agent } => format!("[{}] {} ...", phase, agent),
        BriefingEvent::AgentComplete {
            phase,
            agent,
            status,
            duration_ms,
            summary,
            ..
        } => format!("[{}] {} {} in {}ms: {}", phase, agent, status, duration_ms, summary),
        BriefingEvent::PhaseComplete {
            phase,
            duration_ms,
            completed,
            failed,
            skipped,
        } => format!(
            "[{}] done in {}ms ({} completed, {} failed, {} skipped)",
            phase, duration_ms, completed, failed, skipped
        ),
        BriefingEvent::BriefingComplete {
            run_id,
            status,
            action_count,
            duration_ms,
            ..
        } => format!(
            "Run {} {} in {}ms with {} action(s)",
            run_id, status, duration_ms, action_count
        ),
    }
}

/// Full briefing: header, summary, actions, then agent outcomes.
pub fn briefing(b: &Briefing) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Briefing for {} ({} to {})",
        b.location_slug, b.week_start, b.week_end
    );
    let _ = writeln!(out, "Run: {}", b.run_id);
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Summary{}:",
        if b.has_ai_summary { " (narrative)" } else { "" }
    );
    let _ = writeln!(out, "  {}", b.summary);

    let _ = writeln!(out);
    if b.actions.is_empty() {
        let _ = writeln!(out, "No actions.");
    } else {
        let _ = writeln!(out, "Actions ({}):", b.actions.len());
        for action in &b.actions {
            let date = action
                .date
                .map(|d| format!(" [{}]", d))
                .unwrap_or_default();
            let _ = writeln!(
                out,
                "  {:<6} {}{} ({})",
                action.priority.to_string(),
                action.title,
                date,
                action.source
            );
            if !action.detail.is_empty() {
                let _ = writeln!(out, "         {}", action.detail);
            }
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Agents:");
    for phase in &b.phases {
        for result in &phase.agents {
            let _ = writeln!(
                out,
                "  {} {:<20} {:<9} {}",
                phase.phase,
                result.agent_name,
                result.status.to_string(),
                result.result_summary
            );
        }
    }
    out
}

/// Stored run record.
pub fn run(r: &Run) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Run:        {}", r.id);
    let _ = writeln!(out, "Location:   {}", r.location_slug);
    let _ = writeln!(out, "Week:       {}", r.week_start);
    let _ = writeln!(out, "Status:     {}", r.status);
    if let Some(who) = &r.triggered_by {
        let _ = writeln!(out, "Triggered:  {}", who);
    }
    let _ = writeln!(out, "Started:    {}", r.started_at.format("%Y-%m-%d %H:%M:%S UTC"));
    if let Some(finished) = r.finished_at {
        let _ = writeln!(out, "Finished:   {}", finished.format("%Y-%m-%d %H:%M:%S UTC"));
        let _ = writeln!(out, "Duration:   {}ms", r.duration_ms);
    }
    if let Some(error) = &r.error {
        let _ = writeln!(out, "Error:      {}", error);
    }
    if let Some(summary) = &r.summary {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", summary);
    }
    out
}

/// One line per run, newest first as given.
pub fn run_list(runs: &[Run]) -> String {
    if runs.is_empty() {
        return "No runs found.\n".to_string();
    }
    let mut out = String::new();
    for r in runs {
        let _ = writeln!(
            out,
            "{}  {:<9} {:<20} {}  {}",
            r.id,
            r.status.to_string(),
            r.location_slug,
            r.week_start,
            r.started_at.format("%Y-%m-%d %H:%M")
        );
    }
    out
}

/// Persisted agent results in the order they landed.
pub fn results(records: &[AgentResultRecord]) -> String {
    if records.is_empty() {
        return "No agent results recorded.\n".to_string();
    }
    let mut out = String::new();
    for record in records {
        let r = &record.result;
        let _ = writeln!(
            out,
            "{}  {:<20} {:<9} {:>6}ms {:>3}%  {}",
            record.recorded_at.format("%H:%M:%S"),
            r.agent_name,
            r.status.to_string(),
            r.duration_ms,
            r.confidence,
            r.result_summary
        );
    }
    out
}
