use std::path::Path;
use strawscint_common::{
    plot::{plot_path, save_histogram_svg, Labels, PlotError},
    report::CoincidenceReport,
};

pub(crate) fn save_plots(dir: &Path, report: &CoincidenceReport) -> Result<(), PlotError> {
    for cut in &report.cuts {
        let title = format!("Straw Hits Less Than {}ns After Scint Hits", cut.width);
        save_histogram_svg(
            &plot_path(dir, &format!("straw_coincidence_{}", cut.policy))?,
            &cut.counts,
            Labels {
                title: &title,
                x: "Number of Straws Coinciding with Scint Hit",
                y: "Events",
            },
        )?;

        save_histogram_svg(
            &plot_path(dir, &format!("straw_delay_{}", cut.policy))?,
            &cut.delays,
            Labels {
                title: "Straw Hits Delay after Scint Hits",
                x: "Delay / ns",
                y: "Events",
            },
        )?;
    }
    Ok(())
}
