use crate::ai::MarketReport;
use crate::content::{BUSINESS_PLAN, PATENTS, TALENT_ROSTERS};
use crate::render::StarrySphere;
use crate::sequencer::agents::AgentsView;
use crate::sequencer::{Event, Phase, TalentPick};
use crate::ui::Controller;
use crate::views::presentation::PresentationPanel;
use crate::views::shared::{SceneView, use_scene};
use dioxus::prelude::*;
use std::collections::BTreeSet;

/// The scripted demo area above the chat. Which panel shows is decided
/// entirely by the sequencer phase.
#[component]
pub fn DemoView(controller: Controller) -> Element {
    // Subscribe to the clock so time-driven panels re-render.
    let _ = controller.now.read();
    let phase = controller.sequencer.read().phase().clone();

    let panel = match phase {
        Phase::Idle => rsx! { IdleSphere { controller } },
        Phase::BusinessLoading { query } => rsx! {
            LoadingPanel { title: "ビジネスプランを生成中", detail: Some(query) }
        },
        Phase::BusinessPlan { query, executing } => rsx! {
            BusinessPlanCard { controller, query, executing }
        },
        Phase::MarketAgents { query, .. } => {
            let view = controller.sequencer.read().agents_view();
            match view {
                Some(view) => rsx! { AgentsPanel { query, view } },
                None => rsx! {},
            }
        }
        Phase::PatentLoading => rsx! {
            LoadingPanel { title: "関連特許を検索中", detail: None }
        },
        Phase::PatentGallery { focus } => rsx! { PatentCarousel { controller, focus } },
        Phase::TalentLoading { patent } => rsx! {
            LoadingPanel {
                title: "最適な人材を検索中",
                detail: PATENTS.get(patent).map(|p| p.title.to_string()),
            }
        },
        Phase::TalentManagement { selected, .. } => rsx! {
            TalentPicker { controller, selected }
        },
        Phase::Presentation { patent, team, view, .. } => rsx! {
            PresentationPanel { controller, patent, team, view }
        },
    };

    rsx! {
        section { class: "demo-pane", {panel} }
    }
}

#[component]
fn IdleSphere(controller: Controller) -> Element {
    let (scene, _) = use_scene(|| StarrySphere::new(rand::random()), controller.audio);
    rsx! {
        div { class: "sphere-stage",
            SceneView { scene, class: "sphere-canvas" }
        }
    }
}

#[component]
fn LoadingPanel(title: &'static str, detail: Option<String>) -> Element {
    rsx! {
        div { class: "loading-panel",
            div { class: "spinner" }
            h2 { "{title}" }
            if let Some(detail) = detail {
                p { class: "loading-detail", "「{detail}」" }
            }
        }
    }
}

#[component]
fn BusinessPlanCard(controller: Controller, query: String, executing: bool) -> Element {
    let report = controller.report.read().report().cloned();
    rsx! {
        div { class: "plan-card",
            p { class: "plan-query", "「{query}」" }
            h2 { "{BUSINESS_PLAN.name}" }
            p { class: "plan-tagline", "{BUSINESS_PLAN.tagline}" }
            ul { class: "plan-highlights",
                for highlight in BUSINESS_PLAN.highlights.iter() {
                    li { "{highlight}" }
                }
            }
            if let Some(report) = report {
                ReportSummary { report }
            }
            div { class: "plan-actions",
                button {
                    class: "btn btn-primary",
                    disabled: executing,
                    onclick: move |_| {
                        controller.dispatch(Event::ExecutePlan);
                    },
                    if executing { "実行中…" } else { "プランを実行" }
                }
                button {
                    class: "btn btn-ghost",
                    disabled: executing,
                    onclick: move |_| {
                        controller.dispatch(Event::CancelPlan);
                    },
                    "キャンセル"
                }
            }
        }
    }
}

#[component]
fn ReportSummary(report: MarketReport) -> Element {
    let sections = [
        ("市場規模", report.market_size),
        ("競合", report.competitors),
        ("機会", report.opportunities),
        ("課題", report.challenges),
    ];
    rsx! {
        div { class: "report-grid",
            for (label, body) in sections {
                if !body.is_empty() {
                    div { class: "report-section",
                        h4 { "{label}" }
                        p { "{body}" }
                    }
                }
            }
        }
    }
}

#[component]
fn AgentsPanel(query: String, view: AgentsView) -> Element {
    rsx! {
        div { class: "agents-panel", style: "opacity: {view.opacity};",
            p { class: "plan-query", "「{query}」を分析中" }
            div { class: "agents-grid",
                for panel in view.panels.iter() {
                    div { class: if panel.complete { "agent-card complete" } else { "agent-card" },
                        div { class: "agent-head",
                            h3 { "{panel.name}" }
                            span { class: "agent-role", "{panel.role}" }
                        }
                        div { class: "progress",
                            div { class: "progress-bar", style: "width: {panel.progress}%;" }
                        }
                        span { class: "progress-label", "{panel.progress}%" }
                        if !panel.revealed.is_empty() {
                            p { class: "agent-finding", "{panel.revealed}" }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn PatentCarousel(controller: Controller, focus: usize) -> Element {
    let patent = &PATENTS[focus % PATENTS.len()];
    rsx! {
        div { class: "patent-carousel",
            h2 { "関連特許" }
            div { class: "carousel-row",
                button {
                    class: "btn btn-ghost carousel-nav",
                    onclick: move |_| {
                        controller.dispatch(Event::FocusPatent(-1));
                    },
                    "‹"
                }
                div { class: "patent-card",
                    span { class: "patent-number", "{patent.number}" }
                    h3 { "{patent.title}" }
                    p { class: "patent-holder", "{patent.holder}" }
                    p { "{patent.summary}" }
                    button {
                        class: "btn btn-primary",
                        onclick: move |_| {
                            controller.dispatch(Event::SelectPatent(focus));
                        },
                        "この特許を選択"
                    }
                }
                button {
                    class: "btn btn-ghost carousel-nav",
                    onclick: move |_| {
                        controller.dispatch(Event::FocusPatent(1));
                    },
                    "›"
                }
            }
            div { class: "carousel-dots",
                for index in 0..PATENTS.len() {
                    span { class: if index == focus { "dot active" } else { "dot" } }
                }
            }
        }
    }
}

#[component]
fn TalentPicker(controller: Controller, selected: BTreeSet<TalentPick>) -> Element {
    let nothing_selected = selected.is_empty();
    rsx! {
        div { class: "talent-picker",
            h2 { "チームを編成" }
            div { class: "roster-grid",
                for (roster_index, roster) in TALENT_ROSTERS.iter().enumerate() {
                    div { class: "roster",
                        h3 { "{roster.label}" }
                        for (index, person) in roster.members.iter().enumerate() {
                            {
                                let picked = selected.contains(&TalentPick { roster: roster_index, index });
                                rsx! {
                                    label { class: if picked { "talent-card picked" } else { "talent-card" },
                                        input {
                                            r#type: "checkbox",
                                            checked: picked,
                                            onchange: move |_| {
                                                controller.dispatch(Event::ToggleTalent { roster: roster_index, index });
                                            },
                                        }
                                        div {
                                            strong { "{person.name}" }
                                            span { class: "talent-title", "{person.title}" }
                                            p { "{person.expertise}" }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
            button {
                class: "btn btn-primary",
                disabled: nothing_selected,
                onclick: move |_| {
                    controller.dispatch(Event::CreatePlan);
                },
                "事業計画を作成"
            }
        }
    }
}
