//! Output formatting module
//!
//! This module renders the engine's query surface in the supported output
//! formats. It is a thin consumer: all data comes from the session store's
//! read accessors.

use crate::Result;
use crate::session::SessionStore;
use serde_json::json;

/// Output the current session's data as JSON
pub fn output_json(w: &mut impl std::io::Write, store: &SessionStore) -> Result<()> {
    let output = json!({
        "summary": {
            "total_functions": store.functions().len(),
            "total_transfers": store.transfers().len(),
            "total_graphs": store.graphs().len(),
            "depth": store.depth(),
            "arrow_scale": store.arrow_scale(),
        },
        "functions": store.functions().iter().map(|f| {
            json!({
                "index": f.index,
                "lane": f.lane,
                "start": f.start,
                "end": f.end,
            })
        }).collect::<Vec<_>>(),
        "transfers": store.transfers().iter().map(|t| {
            json!({
                "sender": t.sender,
                "receiver": t.receiver,
                "time": t.time,
                "amount": t.amount,
                "kind": t.kind,
                "token_name": t.token_name,
            })
        }).collect::<Vec<_>>(),
        "graphs": store.graphs().iter().map(|g| {
            let stats = g.stats();
            json!({
                "name": g.name(),
                "states": g.states().iter().map(|s| {
                    json!({
                        "index": s.index,
                        "name": s.name,
                        "color": s.color.to_hex(),
                        "start": s.start,
                        "end": s.end,
                    })
                }).collect::<Vec<_>>(),
                "transitions": stats.total_transitions,
            })
        }).collect::<Vec<_>>(),
    });

    serde_json::to_writer_pretty(&mut *w, &output)?;
    writeln!(w)?; // Add trailing newline
    Ok(())
}

/// Output the current session's data as a text table
pub fn output_table(w: &mut impl std::io::Write, store: &SessionStore) -> Result<()> {
    writeln!(w, "Contract Trace Visualization - Analysis Results")?;
    writeln!(w, "{}", "=".repeat(80))?;
    writeln!(w)?;

    writeln!(w, "Summary:")?;
    writeln!(w, "  Total Functions: {}", store.functions().len())?;
    writeln!(w, "  Total Transfers: {}", store.transfers().len())?;
    writeln!(w, "  State Graphs:    {}", store.graphs().len())?;
    writeln!(w, "  Depth (scaled):  {}", store.depth())?;
    writeln!(w)?;

    if !store.functions().is_empty() {
        writeln!(w, "Functions:")?;
        writeln!(w, "{:-<80}", "")?;
        writeln!(
            w,
            "{:>8} {:>8} {:>12} {:>12}",
            "Index", "Lane", "Start", "End"
        )?;
        writeln!(w, "{:-<80}", "")?;

        for f in store.functions() {
            let end = f
                .end
                .map(|e| e.to_string())
                .unwrap_or_else(|| "-".to_string());
            writeln!(w, "{:>8} {:>8} {:>12} {:>12}", f.index, f.lane, f.start, end)?;
        }
        writeln!(w)?;
    }

    if !store.transfers().is_empty() {
        writeln!(w, "Transfers:")?;
        writeln!(w, "{:-<80}", "")?;
        writeln!(
            w,
            "{:>8} {:>8} {:>12} {:>20} {:<8}",
            "Sender", "Receiver", "Time", "Amount", "Kind"
        )?;
        writeln!(w, "{:-<80}", "")?;

        for t in store.transfers() {
            writeln!(
                w,
                "{:>8} {:>8} {:>12} {:>20} {:<8}",
                t.sender, t.receiver, t.time, t.amount, t.kind
            )?;
        }
        writeln!(w)?;
    }

    for graph in store.graphs() {
        let stats = graph.stats();
        writeln!(
            w,
            "Graph {} ({} states, {} transitions):",
            graph.name(),
            stats.total_states,
            stats.total_transitions
        )?;
        for state in graph.states() {
            writeln!(w, "  [{}] {}", state.index, state.display_short())?;
        }
        writeln!(w)?;
    }

    Ok(())
}

/// Output the current session's state graphs in DOT format
pub fn output_dot(w: &mut impl std::io::Write, store: &SessionStore) -> Result<()> {
    writeln!(
        w,
        "// Generated by contract-trace-viz at {}",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    )?;

    for graph in store.graphs() {
        writeln!(w, "{}", graph.to_dot())?;
    }

    Ok(())
}
