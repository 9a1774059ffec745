use std::error::Error;
use plotters::prelude::*;
use plotters::style::Palette99;

use crate::timeline::Timeline;

/// Log-log plot of the ensemble mean mass over time, one line per
/// labelled timeline, with a band of one standard deviation.
pub fn plot_mean_mass_over_time(
    timelines: &[(&str, &Timeline)],
    filename: &str,
    title: &str,
) -> Result<(), Box<dyn Error>> {
    let series: Vec<(&str, Vec<(f64, f64, f64)>)> = timelines.iter()
        .map(|(label, tl)| {
            let data = tl.points.iter()
                .filter(|tp| tp.time > 0.0)
                .filter_map(|tp| Some((tp.time, tp.mean()?, tp.std_dev()?)))
                .collect();
            (*label, data)
        })
        .collect();

    let all = series.iter().flat_map(|(_, d)| d.iter());
    let (mut t_min, mut t_max) = (f64::INFINITY, 0.0f64);
    let mut m_max = 1.0f64;
    for &(t, m, s) in all {
        t_min = t_min.min(t);
        t_max = t_max.max(t);
        m_max = m_max.max(m + s);
    }
    if !(t_min < t_max) {
        return Err("Timeline has fewer than two sampled time points".into());
    }

    let root = SVGBackend::new(filename, (1024, 640)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d((t_min..t_max).log_scale(), (1.0..m_max * 1.1).log_scale())?;

    chart
        .configure_mesh()
        .x_desc("time")
        .y_desc("mean mass")
        .x_label_formatter(&|x| format!("{:.0e}", x))
        .light_line_style(RGBColor(220, 220, 220))
        .axis_desc_style(("sans-serif", 18))
        .label_style(("sans-serif", 16))
        .draw()?;

    for (i, (label, data)) in series.iter().enumerate() {
        let color = Palette99::pick(i).mix(0.9);

        chart.draw_series(std::iter::once(Polygon::new(
            data.iter().map(|&(t, m, s)| (t, (m + s).max(1.0)))
                .chain(data.iter().rev().map(|&(t, m, s)| (t, (m - s).max(1.0))))
                .collect::<Vec<_>>(),
            color.mix(0.2).filled(),
        )))?;

        chart.draw_series(LineSeries::new(
            data.iter().map(|&(t, m, _)| (t, m)),
            color.stroke_width(2),
        ))?
            .label(label.to_string())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });
    }

    chart
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE.mix(0.8))
        .position(SeriesLabelPosition::UpperLeft)
        .label_font(("sans-serif", 16).into_font())
        .draw()?;

    root.present()?;
    Ok(())
}
