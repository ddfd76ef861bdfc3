use leptos::{component, view, CollectView, IntoView};
use crate::timeline::EventTone;

#[component]
pub fn TimelineLegend() -> impl IntoView {
    let tones = EventTone::LEGEND
        .into_iter()
        .map(|tone| {
            view! {
                <span class="legend-item">
                    <span class=format!("legend-swatch {}", tone.css_class())></span>
                    {tone.label()}
                </span>
            }
        })
        .collect_view();

    view! {
        <div class="timeline-legend">
            <span class="legend-item">
                <span class="legend-swatch planned"></span>
                "Planned"
            </span>
            {tones}
        </div>
    }
}
