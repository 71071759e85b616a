mod common;

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use common::{calls, new_log, Call, CountingProbe, RecordingBackend, StaticNpcs};
use questline::{
    BackendId, EventPayload, QuestConfig, QuestEvent, QuestRouter, ScriptBackend, ScriptKey,
    ScriptKind, TimerSink, ZoneContext,
};

fn router(probe: CountingProbe, npcs: StaticNpcs) -> QuestRouter<CountingProbe> {
    let mut router = QuestRouter::with_probe(QuestConfig::default(), Box::new(npcs), probe);
    router.set_zone(Some(ZoneContext::new("qeynos", 0)));
    router
}

#[test]
fn resolved_entities_are_never_reprobed() {
    let probe = CountingProbe::new();
    probe.add("quests/qeynos/101.pl");
    let log = new_log();
    let npcs = StaticNpcs::new().with(101, "Bob");
    let mut router = router(probe.clone(), npcs);
    router.register_backend(
        Box::new(RecordingBackend::new(1, log.clone()).with_handler(ScriptKind::Npc, "EVENT_SAY")),
        "pl",
    );

    assert!(router.has_quest_sub_local(101, "EVENT_SAY"));
    let after_first = probe.probe_count();
    assert_eq!(after_first, 1);

    assert!(router.has_quest_sub_local(101, "EVENT_SAY"));
    router.event_npc_local(QuestEvent::Say, 101, &EventPayload::default());
    assert_eq!(probe.probe_count(), after_first, "cached outcome must short-circuit probing");

    let load_count = calls(&log)
        .iter()
        .filter(|(_, call)| matches!(call, Call::Load { .. }))
        .count();
    assert_eq!(load_count, 1, "load-and-compile happens exactly once per key");
}

#[test]
fn failed_entities_are_never_reprobed() {
    let probe = CountingProbe::new();
    let log = new_log();
    let npcs = StaticNpcs::new().with(55, "a_gnoll");
    let mut router = router(probe.clone(), npcs);
    router.register_backend(Box::new(RecordingBackend::new(1, log.clone())), "pl");

    assert!(!router.has_quest_sub_local(55, "EVENT_SAY"));
    let after_first = probe.probe_count();
    assert!(after_first > 0);

    assert!(!router.has_quest_sub_local(55, "EVENT_SAY"));
    router.event_npc_local(QuestEvent::Death, 55, &EventPayload::default());
    assert_eq!(probe.probe_count(), after_first, "a recorded miss must stay silent and cached");
    assert!(calls(&log).is_empty(), "failed resolution must never touch a backend");
}

#[test]
fn distinct_keys_resolve_and_load_independently() {
    let probe = CountingProbe::new();
    probe.add("quests/qeynos/1.pl");
    probe.add("quests/qeynos/2.pl");
    let log = new_log();
    let npcs = StaticNpcs::new().with(1, "a").with(2, "b");
    let mut router = router(probe, npcs);
    router.register_backend(Box::new(RecordingBackend::new(1, log.clone())), "pl");

    router.event_npc_local(QuestEvent::Spawn, 1, &EventPayload::default());
    router.event_npc_local(QuestEvent::Spawn, 2, &EventPayload::default());

    let keys: Vec<ScriptKey> = calls(&log)
        .into_iter()
        .filter_map(|(_, call)| match call {
            Call::Load { key, .. } => Some(key),
            _ => None,
        })
        .collect();
    assert_eq!(keys, vec![ScriptKey::Id(1), ScriptKey::Id(2)]);
}

#[test]
fn reload_resets_every_class_and_reprobes() {
    let probe = CountingProbe::new();
    let log = new_log();
    let npcs = StaticNpcs::new().with(101, "Bob");
    let mut router = router(probe.clone(), npcs);
    router.register_backend(
        Box::new(
            RecordingBackend::new(1, log.clone())
                .with_handler(ScriptKind::GlobalNpc, "EVENT_SAY"),
        ),
        "pl",
    );

    // Prime every class with a miss.
    assert!(!router.has_quest_sub(101, "EVENT_SAY"));
    assert!(!router.player_has_quest_sub("EVENT_ENTERZONE"));
    assert!(!router.spell_has_quest_sub(9, "EVENT_SPELL_FADE"));
    let primed = probe.probe_count();

    // Nothing re-probes while the generation is live.
    assert!(!router.has_quest_sub(101, "EVENT_SAY"));
    assert!(!router.player_has_quest_sub("EVENT_ENTERZONE"));
    assert!(!router.spell_has_quest_sub(9, "EVENT_SPELL_FADE"));
    assert_eq!(probe.probe_count(), primed);

    // A script appears on disk; only a reload may pick it up.
    probe.add("quests/templates/global_npc.pl");
    assert!(!router.has_quest_sub(101, "EVENT_SAY"));
    assert_eq!(probe.probe_count(), primed);

    router.reload_quests(false);
    assert!(
        calls(&log).iter().any(|(_, call)| matches!(call, Call::Reload)),
        "backends must be told to drop compiled scripts"
    );
    assert!(router.has_quest_sub(101, "EVENT_SAY"), "reload must re-probe the singleton slot");
    assert!(probe.probe_count() > primed);
}

struct Journal(Rc<RefCell<Vec<&'static str>>>);

impl TimerSink for Journal {
    fn clear_all_timers(&mut self) {
        self.0.borrow_mut().push("timers");
    }
}

struct JournalBackend(Rc<RefCell<Vec<&'static str>>>);

impl ScriptBackend for JournalBackend {
    fn identifier(&self) -> BackendId {
        BackendId(3)
    }
    fn load(&mut self, _: ScriptKind, _: &Path, _: &ScriptKey) {}
    fn has_handler(&self, _: ScriptKind, _: &ScriptKey, _: &str) -> bool {
        false
    }
    fn dispatch(&mut self, _: ScriptKind, _: &ScriptKey, _: QuestEvent, _: &EventPayload) {}
    fn set_var(&mut self, _: &str, _: &str) {}
    fn reload(&mut self) {
        self.0.borrow_mut().push("backend");
    }
}

#[test]
fn reload_clears_timers_before_backends_when_requested() {
    let journal = Rc::new(RefCell::new(Vec::new()));
    let mut router = router(CountingProbe::new(), StaticNpcs::new());
    router.set_timer_sink(Box::new(Journal(journal.clone())));
    router.register_backend(Box::new(JournalBackend(journal.clone())), "rhai");

    router.reload_quests(true);
    assert_eq!(*journal.borrow(), vec!["timers", "backend"]);

    journal.borrow_mut().clear();
    router.reload_quests(false);
    assert_eq!(*journal.borrow(), vec!["backend"], "timers stay untouched unless requested");
}

#[test]
fn broadcast_reaches_backends_in_precedence_order() {
    let log = new_log();
    let mut router = router(CountingProbe::new(), StaticNpcs::new());
    router.register_backend(Box::new(RecordingBackend::new(1, log.clone())), "pl");
    router.register_backend(Box::new(RecordingBackend::new(2, log.clone())), "lua");

    router.broadcast_var("expansion", "4");

    let order: Vec<u32> = calls(&log)
        .into_iter()
        .map(|(id, call)| {
            assert_eq!(
                call,
                Call::SetVar { name: "expansion".to_string(), value: "4".to_string() }
            );
            id.0
        })
        .collect();
    assert_eq!(order, vec![1, 2]);
}
