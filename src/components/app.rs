use gloo_timers::callback::Interval;
use leptos::{component, view, create_effect, create_local_resource, create_signal, on_cleanup, IntoView, SignalGet, SignalSet, SignalUpdate};
use leptos_meta::{provide_meta_context, Stylesheet, Title};
use crate::api::timeline::fetch_timeline_data;
use crate::components::timeline_chart::TimelineChart;
use crate::config::PlaybackSettings;
use crate::logging::log;
use crate::models::TimelineData;

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let settings = PlaybackSettings::load();
    let base_url = settings.api_base_url.clone();
    let query = settings.timeline_query();

    let (refresh, set_refresh) = create_signal(0_u32);
    if let Some(period_ms) = settings.refresh_period_ms() {
        let auto_refresh = Interval::new(period_ms, move || set_refresh.update(|n| *n = n.wrapping_add(1)));
        on_cleanup(move || drop(auto_refresh));
    }
    let timeline = create_local_resource(
        move || refresh.get(),
        move |_| {
            let base_url = base_url.clone();
            let query = query.clone();
            async move { fetch_timeline_data(&base_url, &query).await }
        },
    );

    // The chart keeps one playback driver across refreshes and is fed new data
    let (data, set_data) = create_signal(TimelineData::default());
    let (error, set_error) = create_signal(None::<String>);
    create_effect(move |_| match timeline.get() {
        Some(Ok(fresh)) => {
            log!("Loaded timeline for {} trains", fresh.timeline.len());
            set_data.set(fresh);
            set_error.set(None);
        }
        Some(Err(e)) => {
            web_sys::console::error_1(&format!("Failed to load timeline: {e}").into());
            set_error.set(Some(e));
        }
        None => {}
    });

    view! {
        <Stylesheet id="leptos" href="/pkg/rail_timeline.css"/>
        <Title text="Train Movement Timeline"/>

        <div class="app">
            <div class="app-toolbar">
                <button on:click=move |_| set_refresh.update(|n| *n = n.wrapping_add(1))>"Refresh"</button>
                <span class="app-status">
                    {move || if timeline.loading().get() { "Loading…" } else { "" }}
                </span>
            </div>
            {move || error.get().map(|e| view! { <div class="timeline-error">{e}</div> })}
            <TimelineChart data=data settings=settings/>
        </div>
    }
}
