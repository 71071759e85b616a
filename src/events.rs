use std::fmt;

use crate::world::MobId;

/// The quest event vocabulary. The router never validates which events
/// make sense for which entity class; it only threads the identifier
/// through to whichever backend owns the script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestEvent {
    Say,
    Trade,
    Death,
    Spawn,
    Attack,
    Combat,
    Aggro,
    Slay,
    NpcSlay,
    WaypointArrive,
    WaypointDepart,
    Timer,
    Signal,
    Hp,
    Enter,
    Exit,
    EnterZone,
    ClickDoor,
    Loot,
    LevelUp,
    KilledMerit,
    CastOn,
    TaskAccepted,
    ProximitySay,
    ItemClick,
    ItemClickCast,
    ScaleCalc,
    ItemEnterZone,
    SpellEffectClient,
    SpellEffectNpc,
    SpellBuffTicClient,
    SpellBuffTicNpc,
    SpellFade,
}

impl QuestEvent {
    /// Canonical handler name. Scripts declare handlers under these
    /// names, and item script-key derivation keys off them.
    pub fn name(self) -> &'static str {
        match self {
            QuestEvent::Say => "EVENT_SAY",
            QuestEvent::Trade => "EVENT_ITEM",
            QuestEvent::Death => "EVENT_DEATH",
            QuestEvent::Spawn => "EVENT_SPAWN",
            QuestEvent::Attack => "EVENT_ATTACK",
            QuestEvent::Combat => "EVENT_COMBAT",
            QuestEvent::Aggro => "EVENT_AGGRO",
            QuestEvent::Slay => "EVENT_SLAY",
            QuestEvent::NpcSlay => "EVENT_NPC_SLAY",
            QuestEvent::WaypointArrive => "EVENT_WAYPOINT_ARRIVE",
            QuestEvent::WaypointDepart => "EVENT_WAYPOINT_DEPART",
            QuestEvent::Timer => "EVENT_TIMER",
            QuestEvent::Signal => "EVENT_SIGNAL",
            QuestEvent::Hp => "EVENT_HP",
            QuestEvent::Enter => "EVENT_ENTER",
            QuestEvent::Exit => "EVENT_EXIT",
            QuestEvent::EnterZone => "EVENT_ENTERZONE",
            QuestEvent::ClickDoor => "EVENT_CLICKDOOR",
            QuestEvent::Loot => "EVENT_LOOT",
            QuestEvent::LevelUp => "EVENT_LEVEL_UP",
            QuestEvent::KilledMerit => "EVENT_KILLED_MERIT",
            QuestEvent::CastOn => "EVENT_CAST_ON",
            QuestEvent::TaskAccepted => "EVENT_TASKACCEPTED",
            QuestEvent::ProximitySay => "EVENT_PROXIMITY_SAY",
            QuestEvent::ItemClick => "EVENT_ITEM_CLICK",
            QuestEvent::ItemClickCast => "EVENT_ITEM_CLICK_CAST",
            QuestEvent::ScaleCalc => "EVENT_SCALE_CALC",
            QuestEvent::ItemEnterZone => "EVENT_ITEM_ENTERZONE",
            QuestEvent::SpellEffectClient => "EVENT_SPELL_EFFECT_CLIENT",
            QuestEvent::SpellEffectNpc => "EVENT_SPELL_EFFECT_NPC",
            QuestEvent::SpellBuffTicClient => "EVENT_SPELL_BUFF_TIC_CLIENT",
            QuestEvent::SpellBuffTicNpc => "EVENT_SPELL_BUFF_TIC_NPC",
            QuestEvent::SpellFade => "EVENT_SPELL_FADE",
        }
    }
}

impl fmt::Display for QuestEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Arguments forwarded to a script handler: the acting mob, an optional
/// secondary mob, free-form string data and an auxiliary integer.
#[derive(Debug, Clone, Default)]
pub struct EventPayload {
    pub actor: Option<MobId>,
    pub target: Option<MobId>,
    pub data: String,
    pub extra: u32,
}

impl EventPayload {
    pub fn new(
        actor: Option<MobId>,
        target: Option<MobId>,
        data: impl Into<String>,
        extra: u32,
    ) -> Self {
        Self { actor, target, data: data.into(), extra }
    }
}
