use std::rc::Rc;
use leptos::{component, view, create_effect, create_memo, create_signal, on_cleanup, CollectView, IntoView, ReadSignal, Signal, SignalGet, SignalSet, SignalWith, SignalWithUntracked};
use crate::config::PlaybackSettings;
use crate::constants::AXIS_TICK_COUNT;
use crate::models::TimelineData;
use crate::time::format_clock;
use crate::timeline::{axis_ticks, interpolate_position, train_progress, EventTone, GlooScheduler, NormalizedEvent, NormalizedTrain, PlaybackDriver, PlaybackStatus, TimelineView};
use super::legend::TimelineLegend;

/// Presentation switches for [`TimelineChart`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineChartOptions {
    /// Height of the chart body in pixels
    pub height: u32,
    /// Tighter rows for dashboards
    pub compact: bool,
    /// Drop the card frame when nested in another panel
    pub embedded: bool,
    pub show_header: bool,
    pub show_legend: bool,
}

impl Default for TimelineChartOptions {
    fn default() -> Self {
        Self {
            height: 400,
            compact: false,
            embedded: false,
            show_header: true,
            show_legend: true,
        }
    }
}

fn event_markers(event: &NormalizedEvent) -> impl IntoView {
    let planned = event
        .planned_position
        .zip(event.event.planned_time)
        .map(|(position, time)| {
            view! {
                <div
                    class="event-dot planned"
                    style=format!("left: calc({position:.3}% - 1px)")
                    title=format!("Planned: {}", format_clock(time))
                ></div>
            }
        });

    let tone = EventTone::for_event(&event.event);
    let delay = event.event.effective_delay_minutes().unwrap_or(0.0);
    let actual = event
        .actual_position
        .zip(event.event.actual_time)
        .map(|(position, time)| {
            view! {
                <div
                    class=format!("event-dot actual {}", tone.css_class())
                    style=format!("left: calc({position:.3}% - 2px)")
                    title=format!("Actual: {} ({delay} min delay)", format_clock(time))
                ></div>
            }
        });

    view! { <div class="timeline-event">{planned}{actual}</div> }
}

#[component]
fn TrainRow(train: NormalizedTrain, status: ReadSignal<PlaybackStatus>, compact: bool) -> impl IntoView {
    let NormalizedTrain { train_id, events } = train;
    let dots = events.iter().map(event_markers).collect_view();
    let progress_events = events.clone();

    // Trains without planned events have no marker
    let marker = move || {
        status
            .get()
            .simulated_time
            .and_then(|time| interpolate_position(&events, time))
            .map(|position| {
                view! {
                    <div class="train-marker" style=format!("left: {position:.3}%")>"🚂"</div>
                }
            })
    };

    let progress = move || {
        status
            .get()
            .simulated_time
            .and_then(|time| train_progress(&progress_events, time))
            .map(|percent| {
                view! { <span class="timeline-row-progress">{format!("{percent:.0}% completed")}</span> }
            })
    };

    let row_class = if compact { "timeline-row compact" } else { "timeline-row" };

    view! {
        <div class=row_class>
            <div class="timeline-row-label">"🚂 " {train_id} {progress}</div>
            <div class="timeline-track">
                {dots}
                {marker}
            </div>
        </div>
    }
}

/// Planned vs actual train events on a shared time axis, with playback
#[component]
pub fn TimelineChart(
    #[prop(into)] data: Signal<TimelineData>,
    settings: PlaybackSettings,
    #[prop(optional)] options: TimelineChartOptions,
) -> impl IntoView {
    let timeline_view = create_memo(move |_| data.with(TimelineView::compute_now));

    let driver = Rc::new(PlaybackDriver::new(
        GlooScheduler,
        settings.engine_for(timeline_view.with_untracked(|v| v.range)),
        settings.tick_interval_ms,
    ));
    let (status, set_status) = create_signal(driver.status());
    driver.set_listener(move |s| set_status.set(s));

    // Refreshes that derive the same window keep the current generation
    create_effect({
        let driver = Rc::clone(&driver);
        move |_| {
            let range = timeline_view.with(|v| v.range);
            if range != driver.range() {
                driver.replace_range(range);
            }
        }
    });

    on_cleanup({
        let driver = Rc::clone(&driver);
        move || driver.dispose()
    });

    let toggle_playback = {
        let driver = Rc::clone(&driver);
        move |_| {
            if driver.status().is_playing {
                driver.pause();
            } else {
                driver.start();
            }
        }
    };
    let reset_playback = move |_| driver.reset();

    let header = options.show_header.then(|| {
        view! {
            <div class="timeline-header">
                <div>
                    <h3>"Train Movement Timeline"</h3>
                    <p class="timeline-subtitle">"Visualizing planned vs actual events"</p>
                </div>
                <div class="timeline-controls">
                    <button class="timeline-play" on:click=toggle_playback>
                        {move || if status.get().is_playing { "⏸ Pause" } else { "▶ Play" }}
                    </button>
                    <button class="timeline-reset" on:click=reset_playback>"Reset"</button>
                    <span
                        class="timeline-range"
                        title=move || timeline_view.with(|v| format!("{} – {}", v.range_iso.0, v.range_iso.1))
                    >
                        {move || timeline_view.with(|v| format!("{} – {}", format_clock(v.range.start), format_clock(v.range.end)))}
                    </span>
                    <span class="timeline-clock">
                        {move || status.get().simulated_time.map_or_else(|| "--:--:--".to_string(), format_clock)}
                    </span>
                </div>
            </div>
        }
    });

    let ticks = move || {
        timeline_view
            .with(|v| axis_ticks(v.range, AXIS_TICK_COUNT))
            .into_iter()
            .map(|tick| {
                view! {
                    <div class="axis-tick" style=format!("left: {:.3}%", tick.position) title=format_clock(tick.time)></div>
                }
            })
            .collect_view()
    };

    let compact = options.compact;
    let rows = move || {
        timeline_view.with(|v| {
            if v.is_empty() {
                view! { <div class="timeline-empty">"No timeline data"</div> }.into_view()
            } else {
                v.trains
                    .iter()
                    .cloned()
                    .map(|train| view! { <TrainRow train=train status=status compact=compact/> })
                    .collect_view()
            }
        })
    };

    let container_class = match (options.embedded, options.compact) {
        (true, true) => "timeline-chart embedded compact",
        (true, false) => "timeline-chart embedded",
        (false, true) => "timeline-chart compact",
        (false, false) => "timeline-chart",
    };

    view! {
        <div class=container_class>
            {header}
            <div class="timeline-body" style=format!("height: {}px", options.height)>
                <div class="timeline-axis">
                    <span class="timeline-axis-label">"Time →"</span>
                    <div class="timeline-axis-line">{ticks}</div>
                </div>
                <div class="timeline-rows">{rows}</div>
                {options.show_legend.then(|| view! { <TimelineLegend/> })}
            </div>
        </div>
    }
}
