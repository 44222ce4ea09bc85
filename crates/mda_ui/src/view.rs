//! Dashboard layout: sidebar controls plus one section per active metric.

use iced::widget::{
    button, checkbox, container, pick_list, scrollable, slider, text, Column, Row,
};
use iced::{Alignment, Element, Length};

use mda_core::analysis::diffusivity::{fit_self_diffusivity, FitError};
use mda_core::charts::{self, ChartSpec};
use mda_core::models::{InputKind, Metric};

use crate::app::{App, FileChoice, Message};
use crate::chart::LineChart;
use crate::theme::{font, spacing};

/// Build the full window view.
pub fn view(app: &App) -> Element<'_, Message> {
    let content = Row::new()
        .push(
            container(sidebar(app))
                .width(Length::Fixed(320.0))
                .height(Length::Fill)
                .padding(spacing::MD),
        )
        .push(
            container(scrollable(metric_sections(app)).height(Length::Fill))
                .width(Length::Fill)
                .padding(spacing::MD),
        );

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

/// Sidebar: input pick lists, metric toggles, recalculate buttons.
fn sidebar(app: &App) -> Element<'_, Message> {
    let mut column = Column::new()
        .spacing(spacing::SM)
        .push(text("Inputs").size(font::LG));

    for kind in [InputKind::Trajectory, InputKind::Topology, InputKind::Box] {
        column = column.push(input_picker(app, kind));
    }

    column = column.push(
        button(text("Rescan files").size(font::SM))
            .on_press(Message::RefreshInputs)
            .padding(spacing::XS),
    );

    if let Some(error) = &app.scan_error {
        column = column.push(text(error.as_str()).size(font::SM));
    }
    if app.selection().is_none() {
        column = column.push(
            text("Select a trajectory, topology and box file to enable the metrics.")
                .size(font::SM),
        );
    }

    column = column.push(text("Metrics").size(font::LG));

    let inputs_ready = app.selection().is_some();
    for metric in Metric::ALL {
        let enabled = app.is_enabled(metric);
        let label = format!("Calculate {}", metric.display_name());
        let toggle = checkbox(label, enabled)
            .text_size(font::NORMAL)
            .on_toggle_maybe(if inputs_ready {
                Some(move |on| Message::ToggleMetric(metric, on))
            } else {
                None
            });
        column = column.push(toggle);

        if enabled {
            let mut controls = Row::new().spacing(spacing::SM).align_y(Alignment::Center);
            controls = controls.push(
                button(text(format!("Recalculate {}", metric.display_name())).size(font::SM))
                    .on_press(Message::Recalculate(metric))
                    .padding(spacing::XS),
            );
            if app.is_stale(metric) {
                controls = controls.push(text("inputs changed").size(font::SM));
            }
            column = column.push(controls);
        }
    }

    column.into()
}

/// One labeled pick list over the discovered candidates.
fn input_picker(app: &App, kind: InputKind) -> Element<'_, Message> {
    let choices: Vec<FileChoice> = app
        .catalog
        .candidates(kind)
        .iter()
        .map(|p| FileChoice(p.clone()))
        .collect();
    let empty = choices.is_empty();
    let picker = pick_list(choices, app.selected(kind).cloned(), move |choice| {
        Message::InputSelected(kind, choice)
    })
    .text_size(font::NORMAL)
    .width(Length::Fill);

    let mut column = Column::new()
        .spacing(spacing::XS)
        .push(text(format!("Select {}", kind.display_name())).size(font::NORMAL))
        .push(picker);
    if empty {
        column = column.push(
            text(format!("no *.{} files found", kind.extension())).size(font::SM),
        );
    }
    column.into()
}

/// The main column: one section per active metric, in sidebar order.
fn metric_sections(app: &App) -> Element<'_, Message> {
    let mut column = Column::new().spacing(spacing::LG);
    let mut any = false;
    for metric in Metric::ALL {
        if app.is_enabled(metric) {
            column = column.push(metric_section(app, metric));
            any = true;
        }
    }
    if !any {
        column = column.push(
            text("Enable a metric in the sidebar to see its results.").size(font::NORMAL),
        );
    }
    column.into()
}

fn metric_section(app: &App, metric: Metric) -> Element<'_, Message> {
    let mut section = Column::new()
        .spacing(spacing::SM)
        .push(text(metric.display_name()).size(font::LG));

    // A failed computation renders as a message, never a partial chart.
    if let Some(error) = app.metric_error(metric) {
        return section
            .push(text(format!("Error: {error}")).size(font::NORMAL))
            .into();
    }

    match metric {
        Metric::Rdf => {
            if let Some(result) = app.rdf_result() {
                let reference = app.reference.as_ref().ok();
                match charts::rdf_chart(result, reference) {
                    Ok(spec) => {
                        if let Err(error) = &app.reference {
                            section = section.push(
                                text(format!("reference curve unavailable: {error}"))
                                    .size(font::SM),
                            );
                        }
                        section = section.push(chart_canvas(spec));
                    }
                    Err(e) => section = section.push(text(e.to_string()).size(font::NORMAL)),
                }
            }
        }
        Metric::LinearDensity => {
            if let Some(result) = app.density_result() {
                match charts::linear_density_chart(result) {
                    Ok(spec) => section = section.push(chart_canvas(spec)),
                    Err(e) => section = section.push(text(e.to_string()).size(font::NORMAL)),
                }
            }
        }
        Metric::Msd => {
            if let Some(result) = app.msd_result() {
                section = section.push(msd_section(app, result));
            }
        }
        Metric::Dielectric => {
            if let Some(result) = app.dielectric_result() {
                section = section
                    .push(text(format!("Dielectric constant: {}", result.eps_mean))
                        .size(font::NORMAL));
            }
        }
    }

    section.into()
}

/// MSD block: timestep note, fit-window sliders, chart, diffusivity.
fn msd_section<'a>(
    app: &'a App,
    result: &mda_core::analysis::MsdResult,
) -> Element<'a, Message> {
    let timestep = app.timestep_fs();
    let window = app.fit_window_for(result);
    let max_fs = (result.n_frames().saturating_sub(1)) as f64 * timestep;

    let mut column = Column::new().spacing(spacing::SM).push(
        text(format!(
            "Calculating MSD with a timestep of {timestep} fs (assumed value, not read from the trajectory)"
        ))
        .size(font::NORMAL),
    );

    if max_fs > 0.0 {
        let start_row = Row::new()
            .spacing(spacing::SM)
            .align_y(Alignment::Center)
            .push(text("Fit start (fs)").size(font::SM).width(Length::Fixed(100.0)))
            .push(
                slider(0.0..=max_fs, window.start_fs, Message::FitStartChanged)
                    .step(timestep),
            )
            .push(text(format!("{:.0}", window.start_fs)).size(font::SM));
        let end_row = Row::new()
            .spacing(spacing::SM)
            .align_y(Alignment::Center)
            .push(text("Fit end (fs)").size(font::SM).width(Length::Fixed(100.0)))
            .push(slider(0.0..=max_fs, window.end_fs, Message::FitEndChanged).step(timestep))
            .push(text(format!("{:.0}", window.end_fs)).size(font::SM));
        column = column.push(start_row).push(end_row);
    }

    match charts::msd_chart(result, timestep, &window) {
        Ok(spec) => column = column.push(chart_canvas(spec)),
        Err(e) => column = column.push(text(e.to_string()).size(font::NORMAL)),
    }

    match fit_self_diffusivity(result, timestep, window) {
        Ok(fit) => {
            column = column.push(
                text(format!(
                    "Self-diffusivity coefficient: {:.3E} m²/s",
                    fit.display_m2_per_s()
                ))
                .size(font::NORMAL),
            );
        }
        Err(FitError::WindowTooNarrow { frames }) => {
            column = column.push(
                text(format!(
                    "Fit window too narrow ({frames} frame(s)); widen it to estimate the diffusivity."
                ))
                .size(font::NORMAL),
            );
        }
    }

    column.into()
}

fn chart_canvas<'a>(spec: ChartSpec) -> Element<'a, Message> {
    iced::widget::canvas(LineChart::new(spec))
        .width(Length::Fill)
        .height(Length::Fixed(340.0))
        .into()
}
