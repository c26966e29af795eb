use hivefold::engine::progress::{Progress, ProgressReporter};
use indicatif::{ProgressBar, ProgressStyle};

/// Wires the engine's progress events into an indicatif bar over the search
/// cycles.
pub fn cycle_bar_reporter(bar: ProgressBar) -> ProgressReporter<'static> {
    bar.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] cycle {pos}/{len} {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    ProgressReporter::with_callback(Box::new(move |event| match event {
        Progress::SearchStart { total_cycles } => bar.set_length(total_cycles),
        Progress::CycleFinish { best_fitness, .. } => {
            bar.set_message(format!("best {best_fitness:.3}"));
            bar.inc(1);
        }
        Progress::SearchFinish => bar.finish_with_message("done"),
        Progress::Message(text) => bar.set_message(text),
    }))
}
