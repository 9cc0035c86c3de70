//! Browser glue: binds the page, turns clicks into input events and applies the
//! [`Effect`]s the session answers with.
//!
//! All timers go through [`Ui::schedule`], which books every `setTimeout` handle
//! until it fires so a reset can clear whatever playback or turn change is still
//! pending.
use std::cell::RefCell;

use log::{error, info, trace, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, HtmlAudioElement, window};

use crate::animation::AnimationQueue;
use crate::config::GameConfig;
use crate::game::{Effect, GameSession, InputEvent, Layout, RandomColors, ScheduledTask, skill_label};
use crate::input::{ClickTarget, route};
use crate::pad::{PADS, PadColor};

type Session = GameSession<RandomColors<StdRng>>;

const HIDDEN: &str = "hidden";
const PRE_GAME: &str = "pre-game";
const UNCLICKABLE: &str = "unclickable";
const ACTIVATED: &str = "activated";

struct PadView {
    color: PadColor,
    element: Element,
    label: Option<Element>, // <span> holding the level number
    level: u8,
    sound: HtmlAudioElement,
}

impl PadView {
    fn play(&self) {
        // Rewind so quick repeats of the same pad are all audible.
        self.sound.set_current_time(0.0);
        if let Err(e) = self.sound.play() {
            warn!("could not play {} sound: {e:?}", self.color);
        }
    }
}

struct Ui {
    start_button: Element,
    status: Element,
    skill_level: Element,
    heading: Element,
    pad_container: Element,
    main: Element,
    pads: Vec<PadView>,
    timers: TimerBook,
}

/// `setTimeout` handles that have been scheduled but not yet fired.
#[derive(Debug, Default)]
struct TimerBook {
    next_ticket: u32,
    pending: Vec<(u32, i32)>, // (ticket, handle)
}

impl TimerBook {
    fn issue(&mut self) -> u32 {
        let ticket = self.next_ticket;
        self.next_ticket = self.next_ticket.wrapping_add(1);
        ticket
    }

    fn record(&mut self, ticket: u32, handle: i32) {
        self.pending.push((ticket, handle));
    }

    fn fired(&mut self, ticket: u32) {
        self.pending.retain(|&(t, _)| t != ticket);
    }

    fn drain(&mut self) -> impl Iterator<Item = i32> + '_ {
        self.pending.drain(..).map(|(_, handle)| handle)
    }

    fn len(&self) -> usize {
        self.pending.len()
    }
}

/// Effects split around notifications: an alert blocks, so it must run with no
/// borrow of the page state held.
#[derive(Debug, PartialEq, Eq)]
enum Batch {
    Apply(Vec<Effect>),
    Alert(String),
}

fn batches(effects: Vec<Effect>) -> Vec<Batch> {
    let mut out = Vec::new();
    let mut current = Vec::new();
    for effect in effects {
        match effect {
            Effect::Notify { outcome, message } => {
                info!("{outcome:?}: {message}");
                if !current.is_empty() {
                    out.push(Batch::Apply(std::mem::take(&mut current)));
                }
                out.push(Batch::Alert(message));
            }
            other => current.push(other),
        }
    }
    if !current.is_empty() {
        out.push(Batch::Apply(current));
    }
    out
}

thread_local! {
    static SESSION: RefCell<Option<Session>> = RefCell::new(None);
    static UI: RefCell<Option<Ui>> = RefCell::new(None);
}

fn query(doc: &Document, selector: &str) -> Result<Element, JsValue> {
    doc.query_selector(selector)?
        .ok_or_else(|| JsValue::from_str(&format!("missing element '{selector}'")))
}

fn set_text(element: &Element, text: &str) {
    element.set_text_content(Some(text));
}

fn toggle(element: &Element, class: &str, on: bool) {
    let list = element.class_list();
    let res = if on { list.add_1(class) } else { list.remove_1(class) };
    if let Err(e) = res {
        warn!("class '{class}' toggle failed: {e:?}");
    }
}

impl Ui {
    fn bind(doc: &Document) -> Result<Self, JsValue> {
        let mut pads = Vec::with_capacity(PADS.len());
        for pad in PADS.iter() {
            let element = query(doc, &format!(".{}", pad.selector))?;
            let label = element.query_selector("span")?;
            pads.push(PadView {
                color: pad.color,
                element,
                label,
                level: pad.level,
                sound: HtmlAudioElement::new_with_src(pad.sound)?,
            });
        }
        Ok(Self {
            start_button: query(doc, ".js-start-button")?,
            status: query(doc, ".js-status")?,
            skill_level: query(doc, ".js-skill-level")?,
            heading: query(doc, ".js-heading")?,
            pad_container: query(doc, ".js-pad-container")?,
            main: query(doc, "main")?,
            pads,
            timers: TimerBook::default(),
        })
    }

    fn pad(&self, color: PadColor) -> Option<&PadView> {
        self.pads.iter().find(|p| p.color == color)
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::SetHeading(text) => set_text(&self.heading, &text),
            Effect::SetStatus(text) => set_text(&self.status, &text),
            Effect::SetSkillLabel(text) => set_text(&self.skill_level, &text),
            Effect::Layout(layout) => {
                let pre_game = layout == Layout::PreGame;
                toggle(&self.start_button, HIDDEN, !pre_game);
                toggle(&self.skill_level, HIDDEN, !pre_game);
                toggle(&self.status, HIDDEN, pre_game);
                toggle(&self.main, PRE_GAME, pre_game);
            }
            Effect::LevelLabels(show) => {
                for pad in &self.pads {
                    if let Some(label) = &pad.label {
                        let text = if show { pad.level.to_string() } else { String::new() };
                        set_text(label, &text);
                    }
                }
            }
            Effect::LockPads => toggle(&self.pad_container, UNCLICKABLE, true),
            Effect::UnlockPads => toggle(&self.pad_container, UNCLICKABLE, false),
            Effect::PlaySound(color) => {
                if let Some(pad) = self.pad(color) {
                    pad.play();
                }
            }
            Effect::Animate(queue) => self.animate(queue),
            Effect::Schedule { delay_ms, task } => self.schedule(delay_ms, move || fire(task)),
            Effect::CancelPending => self.cancel_pending(),
            Effect::Notify { message, .. } => {
                warn!("notification reached the page state unbatched: {message}");
            }
        }
    }

    /// Lights each cue's pad and plays its sound, then turns the light off again.
    fn animate(&mut self, queue: AnimationQueue) {
        for cue in queue {
            let Some(pad) = self.pad(cue.color) else { continue };
            let (on_el, off_el) = (pad.element.clone(), pad.element.clone());
            let sound = pad.sound.clone();
            let color = cue.color;
            self.schedule(cue.start_ms, move || {
                toggle(&on_el, ACTIVATED, true);
                sound.set_current_time(0.0);
                if let Err(e) = sound.play() {
                    warn!("could not play {color} sound: {e:?}");
                }
            });
            self.schedule(cue.end_ms(), move || toggle(&off_el, ACTIVATED, false));
        }
    }

    fn schedule(&mut self, delay_ms: u32, f: impl FnOnce() + 'static) {
        let Some(w) = window() else { return };
        let ticket = self.timers.issue();
        let cb = Closure::once_into_js(move || {
            timer_fired(ticket);
            f();
        });
        match w.set_timeout_with_callback_and_timeout_and_arguments_0(
            cb.unchecked_ref(),
            delay_ms as i32,
        ) {
            Ok(handle) => self.timers.record(ticket, handle),
            Err(e) => error!("setTimeout failed: {e:?}"),
        }
    }

    fn cancel_pending(&mut self) {
        if let Some(w) = window() {
            for handle in self.timers.drain() {
                w.clear_timeout_with_handle(handle);
            }
        }
        for pad in &self.pads {
            toggle(&pad.element, ACTIVATED, false);
        }
    }
}

fn apply_all(effects: Vec<Effect>) {
    for batch in batches(effects) {
        match batch {
            Batch::Apply(effects) => UI.with(|cell| {
                if let Some(ui) = cell.borrow_mut().as_mut() {
                    for effect in effects {
                        ui.apply(effect);
                    }
                }
            }),
            Batch::Alert(message) => {
                if let Some(w) = window() {
                    if let Err(e) = w.alert_with_message(&message) {
                        error!("alert failed: {e:?}");
                    }
                }
            }
        }
    }
}

fn timer_fired(ticket: u32) {
    UI.with(|cell| {
        if let Some(ui) = cell.borrow_mut().as_mut() {
            ui.timers.fired(ticket);
            trace!("timer {ticket} fired, {} pending", ui.timers.len());
        }
    });
}

fn dispatch(event: InputEvent) {
    let effects = SESSION.with(|cell| {
        cell.borrow_mut()
            .as_mut()
            .map(|s| s.handle(event))
            .unwrap_or_default()
    });
    apply_all(effects);
}

fn fire(task: ScheduledTask) {
    let effects = SESSION.with(|cell| {
        cell.borrow_mut()
            .as_mut()
            .map(|s| s.fire(task))
            .unwrap_or_default()
    });
    apply_all(effects);
}

fn click_target(element: &Element) -> Option<ClickTarget> {
    if let Some(color) = element.get_attribute("data-color") {
        return match color.parse::<PadColor>() {
            Ok(c) => Some(ClickTarget::Pad(c)),
            Err(e) => {
                warn!("{e}");
                None
            }
        };
    }
    element.get_attribute("data-level").map(ClickTarget::Label)
}

/// Binds the page and installs a fresh session. Fails if an expected element is missing.
pub fn mount() -> Result<(), JsValue> {
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;

    let ui = Ui::bind(&doc)?;
    let start_button = ui.start_button.clone();
    let pad_container = ui.pad_container.clone();

    let config = GameConfig::default();
    let mut session = GameSession::new(config, RandomColors(StdRng::from_entropy()));
    let mut initial = session.reset();
    initial.push(Effect::SetSkillLabel(skill_label(session.skill_level())));

    UI.with(|cell| cell.replace(Some(ui)));
    SESSION.with(|cell| cell.replace(Some(session)));
    apply_all(initial);

    // Start button
    {
        let closure = Closure::wrap(Box::new(move |_evt: web_sys::MouseEvent| {
            dispatch(InputEvent::StartPressed);
        }) as Box<dyn FnMut(_)>);
        start_button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    // Pad clicks are delegated to the container; the target decides pad vs level label.
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::MouseEvent| {
            let Some(element) = evt.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
                return;
            };
            let Some(target) = click_target(&element) else { return };
            let idle = SESSION.with(|cell| cell.borrow().as_ref().is_none_or(|s| s.is_idle()));
            if let Some(event) = route(target, idle) {
                dispatch(event);
            }
        }) as Box<dyn FnMut(_)>);
        pad_container.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    info!("simon says ready");
    Ok(())
}

/// Current session state as JSON, for page-level test harnesses.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn session_snapshot() -> Option<String> {
    SESSION.with(|cell| {
        cell.borrow()
            .as_ref()
            .and_then(|s| serde_json::to_string(&s.snapshot()).ok())
    })
}
