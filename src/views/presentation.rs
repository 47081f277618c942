use crate::content::{PATENTS, TALENT_ROSTERS, VERIFICATION_SUBTITLE, VERIFICATION_TITLE};
use crate::sequencer::presentation::{CardView, SlideView};
use crate::sequencer::{Event, PresentationView, TalentPick};
use crate::ui::Controller;
use dioxus::prelude::*;

#[component]
pub fn PresentationPanel(
    controller: Controller,
    patent: usize,
    team: Vec<TalentPick>,
    view: PresentationView,
) -> Element {
    // Slides and cards are functions of the clock.
    let _ = controller.now.read();
    let names: Vec<&'static str> = team
        .iter()
        .filter_map(|pick| TALENT_ROSTERS.get(pick.roster)?.members.get(pick.index))
        .map(|person| person.name)
        .collect();
    let team_names = names.join("、");
    let patent_title = PATENTS.get(patent).map(|p| p.title).unwrap_or_default();

    let body = match view {
        PresentationView::Slides => {
            let slides = controller.sequencer.read().slide_views().unwrap_or_default();
            rsx! { SlideGrid { slides } }
        }
        PresentationView::Verification => {
            let cards = controller.sequencer.read().card_views().unwrap_or_default();
            rsx! { VerificationGrid { cards } }
        }
    };

    rsx! {
        div { class: "presentation",
            div { class: "presentation-head",
                div {
                    h2 { "事業計画プレゼンテーション" }
                    p { class: "presentation-meta", "特許: {patent_title}" }
                    p { class: "presentation-meta", "チーム: {team_names}" }
                }
                {match view {
                    PresentationView::Slides => rsx! {
                        button {
                            class: "btn btn-primary",
                            onclick: move |_| {
                                controller.dispatch(Event::ShowVerification);
                            },
                            "検証を再実行"
                        }
                    },
                    PresentationView::Verification => rsx! {
                        button {
                            class: "btn btn-ghost",
                            onclick: move |_| {
                                controller.dispatch(Event::ShowSlides);
                            },
                            "スライドに戻る"
                        }
                    },
                }}
            }
            {body}
        }
    }
}

#[component]
fn SlideGrid(slides: Vec<SlideView>) -> Element {
    rsx! {
        div { class: "slide-grid",
            for view in slides {
                div { key: "{view.slide.slide_number}", class: "slide-card",
                    if view.code_complete {
                        img { src: "{view.slide.image_path}", alt: "{view.slide.title}" }
                    } else {
                        pre { class: "slide-source", code { "{view.typed}" } }
                    }
                    div { class: "slide-caption",
                        span { "{view.slide.slide_number}" }
                        span { "{view.slide.title}" }
                    }
                }
            }
        }
    }
}

#[component]
fn VerificationGrid(cards: Vec<CardView>) -> Element {
    rsx! {
        div { class: "verification",
            h3 { "{VERIFICATION_TITLE}" }
            p { class: "verification-subtitle", "{VERIFICATION_SUBTITLE}" }
            div { class: "verification-grid",
                for card in cards {
                    div { key: "{card.item.id}",
                        class: if card.progress >= 100 { "verification-card done" } else { "verification-card" },
                        h4 { "{card.item.title}" }
                        p { "{card.item.description}" }
                        div { class: "progress",
                            div { class: "progress-bar", style: "width: {card.progress}%;" }
                        }
                        span { class: "progress-label", "{card.progress}%" }
                    }
                }
            }
        }
    }
}
