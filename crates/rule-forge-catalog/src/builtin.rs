// rule-forge-catalog/src/builtin.rs
// ============================================================================
// Module: Builtin Catalog
// Description: Compact built-in definition tables and option resolvers.
// Purpose: Provide a verified starting catalog for tests, demos, and fresh installs.
// Dependencies: rule-forge-core, serde_json
// ============================================================================

//! ## Overview
//! The builtin catalog covers a small poker-flavored slice of the definition
//! space: a handful of triggers, conditions, and effects with static,
//! computed, and derived option sources, visibility gates, exemptions, and
//! variable kind restrictions. It is intentionally small; real deployments
//! load their full catalog from documents and only fall back to this table
//! when none is configured.

// ============================================================================
// SECTION: Imports
// ============================================================================

use rule_forge_core::ConditionTypeDefinition;
use rule_forge_core::DefinitionRegistry;
use rule_forge_core::EffectTypeDefinition;
use rule_forge_core::LocalizedText;
use rule_forge_core::ObjectKind;
use rule_forge_core::OptionsSource;
use rule_forge_core::ParamId;
use rule_forge_core::ParamOption;
use rule_forge_core::ParamValues;
use rule_forge_core::ParameterDefinition;
use rule_forge_core::ParameterKind;
use rule_forge_core::ResolverRegistry;
use rule_forge_core::ShowWhen;
use rule_forge_core::TriggerDefinition;
use rule_forge_core::TriggerId;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Object kinds known to the builtin catalog.
pub const BUILTIN_OBJECT_KINDS: [&str; 4] = ["joker", "consumable", "voucher", "deck"];

/// Poker hands served by the builtin `poker_hands` resolver.
const POKER_HANDS: [&str; 8] = [
    "pair",
    "two_pair",
    "three_of_a_kind",
    "straight",
    "flush",
    "full_house",
    "four_of_a_kind",
    "straight_flush",
];

/// Card ranks served by the builtin `ranks_for_suit` resolver.
const CARD_RANKS: [&str; 13] =
    ["2", "3", "4", "5", "6", "7", "8", "9", "10", "J", "Q", "K", "A"];

// ============================================================================
// SECTION: Builtin Registry
// ============================================================================

/// Builds the builtin definition registry.
#[must_use]
pub fn builtin_registry() -> DefinitionRegistry {
    DefinitionRegistry::new(builtin_triggers(), builtin_conditions(), builtin_effects())
}

/// Builds the trigger table.
fn builtin_triggers() -> Vec<TriggerDefinition> {
    vec![
        TriggerDefinition {
            id: TriggerId::from("hand_played"),
            label: LocalizedText::from("Hand played"),
            description: LocalizedText::from("Fires when the player plays a hand."),
            category: Some("scoring".to_owned()),
            object_users: objects(&["joker"]),
        },
        TriggerDefinition {
            id: TriggerId::from("card_scored"),
            label: LocalizedText::from("Card scored"),
            description: LocalizedText::from("Fires once per scoring card."),
            category: Some("scoring".to_owned()),
            object_users: objects(&["joker", "consumable"]),
        },
        TriggerDefinition {
            id: TriggerId::from("round_end"),
            label: LocalizedText::from("Round end"),
            description: LocalizedText::from("Fires when the round resolves."),
            category: Some("round".to_owned()),
            object_users: objects(&["joker", "deck"]),
        },
    ]
}

/// Builds the condition type table.
fn builtin_conditions() -> Vec<ConditionTypeDefinition> {
    vec![
        ConditionTypeDefinition {
            id: "contains_pair".into(),
            label: LocalizedText::from("Hand contains a pair"),
            description: LocalizedText::from("True when the played hand holds at least a pair."),
            category: Some("hand".to_owned()),
            params: Vec::new(),
            applicable_triggers: Some(vec![TriggerId::from("hand_played")]),
            object_users: objects(&["joker"]),
        },
        ConditionTypeDefinition {
            id: "hand_size".into(),
            label: LocalizedText::from("Hand size"),
            description: LocalizedText::from("Compares the played hand's card count."),
            category: Some("hand".to_owned()),
            params: vec![ParameterDefinition {
                id: ParamId::from("count"),
                kind: ParameterKind::Number,
                label: LocalizedText::from("Card count"),
                options: None,
                min: Some(0.0),
                max: Some(8.0),
                default: Some(json!(5)),
                show_when: None,
                variable_types: Vec::new(),
                exempt_objects: Vec::new(),
            }],
            applicable_triggers: Some(vec![TriggerId::from("hand_played")]),
            object_users: objects(&["joker"]),
        },
        ConditionTypeDefinition {
            id: "poker_hand".into(),
            label: LocalizedText::from("Poker hand"),
            description: LocalizedText::from("True when the played hand matches the selection."),
            category: Some("hand".to_owned()),
            params: vec![ParameterDefinition {
                id: ParamId::from("hand"),
                kind: ParameterKind::Select,
                label: LocalizedText::from("Hand"),
                options: Some(OptionsSource::Computed {
                    resolver: "poker_hands".into(),
                }),
                min: None,
                max: None,
                default: None,
                show_when: None,
                variable_types: vec!["pokerhand".into()],
                exempt_objects: Vec::new(),
            }],
            applicable_triggers: Some(vec![TriggerId::from("hand_played")]),
            object_users: objects(&["joker"]),
        },
        ConditionTypeDefinition {
            id: "card_rank".into(),
            label: LocalizedText::from("Card rank"),
            description: LocalizedText::from("Matches the scoring card's suit and rank."),
            category: Some("card".to_owned()),
            params: vec![
                ParameterDefinition {
                    id: ParamId::from("suit"),
                    kind: ParameterKind::Select,
                    label: LocalizedText::from("Suit"),
                    options: Some(OptionsSource::Static {
                        options: suit_options(),
                    }),
                    min: None,
                    max: None,
                    default: None,
                    show_when: None,
                    variable_types: vec!["suit".into()],
                    exempt_objects: Vec::new(),
                },
                ParameterDefinition {
                    id: ParamId::from("rank"),
                    kind: ParameterKind::Select,
                    label: LocalizedText::from("Rank"),
                    options: Some(OptionsSource::Derived {
                        resolver: "ranks_for_suit".into(),
                    }),
                    min: None,
                    max: None,
                    default: None,
                    show_when: None,
                    variable_types: vec!["rank".into()],
                    exempt_objects: Vec::new(),
                },
            ],
            applicable_triggers: Some(vec![TriggerId::from("card_scored")]),
            object_users: objects(&["joker", "consumable"]),
        },
    ]
}

/// Builds the effect type table.
fn builtin_effects() -> Vec<EffectTypeDefinition> {
    vec![
        EffectTypeDefinition {
            id: "add_mult".into(),
            label: LocalizedText::from("Add mult"),
            description: LocalizedText::from("Adds to the hand's mult."),
            category: Some("scoring".to_owned()),
            params: vec![ParameterDefinition {
                id: ParamId::from("amount"),
                kind: ParameterKind::Number,
                label: LocalizedText::from("Amount"),
                options: None,
                min: Some(0.0),
                max: Some(9999.0),
                default: Some(json!(4)),
                show_when: None,
                variable_types: vec!["mult".into(), "joker_context".into()],
                exempt_objects: Vec::new(),
            }],
            applicable_triggers: Some(vec![
                TriggerId::from("hand_played"),
                TriggerId::from("card_scored"),
            ]),
            object_users: objects(&["joker"]),
        },
        EffectTypeDefinition {
            id: "add_chips".into(),
            label: LocalizedText::from("Add chips"),
            description: LocalizedText::from("Adds to the hand's chips."),
            category: Some("scoring".to_owned()),
            params: vec![ParameterDefinition {
                id: ParamId::from("amount"),
                kind: ParameterKind::Number,
                label: LocalizedText::from("Amount"),
                options: None,
                min: Some(0.0),
                max: Some(9999.0),
                default: Some(json!(30)),
                show_when: None,
                variable_types: vec!["chips".into(), "joker_context".into()],
                exempt_objects: Vec::new(),
            }],
            applicable_triggers: None,
            object_users: objects(&["joker"]),
        },
        EffectTypeDefinition {
            id: "destroy_card".into(),
            label: LocalizedText::from("Destroy card"),
            description: LocalizedText::from("Removes the scoring card from the deck."),
            category: Some("card".to_owned()),
            params: Vec::new(),
            applicable_triggers: Some(vec![TriggerId::from("card_scored")]),
            object_users: objects(&["joker", "consumable"]),
        },
        EffectTypeDefinition {
            id: "set_counter".into(),
            label: LocalizedText::from("Set counter"),
            description: LocalizedText::from("Adjusts the object's internal counter."),
            category: Some("state".to_owned()),
            params: vec![
                ParameterDefinition {
                    id: ParamId::from("mode"),
                    kind: ParameterKind::Select,
                    label: LocalizedText::from("Mode"),
                    options: Some(OptionsSource::Static {
                        options: vec![
                            option(json!("set"), "Set"),
                            option(json!("add"), "Add"),
                            exempt_option(json!("reset_all"), "Reset all", &["consumable"]),
                        ],
                    }),
                    min: None,
                    max: None,
                    default: Some(json!("add")),
                    show_when: None,
                    variable_types: Vec::new(),
                    exempt_objects: Vec::new(),
                },
                ParameterDefinition {
                    id: ParamId::from("value"),
                    kind: ParameterKind::Number,
                    label: LocalizedText::from("Value"),
                    options: None,
                    min: Some(-9999.0),
                    max: Some(9999.0),
                    default: Some(json!(1)),
                    show_when: Some(ShowWhen {
                        parameter: ParamId::from("mode"),
                        values: vec!["set".to_owned(), "add".to_owned()],
                    }),
                    variable_types: vec!["counter".into()],
                    exempt_objects: Vec::new(),
                },
            ],
            applicable_triggers: None,
            object_users: objects(&["joker", "consumable"]),
        },
        EffectTypeDefinition {
            id: "retrigger_card".into(),
            label: LocalizedText::from("Retrigger card"),
            description: LocalizedText::from("Scores the card again."),
            category: Some("card".to_owned()),
            params: vec![ParameterDefinition {
                id: ParamId::from("force"),
                kind: ParameterKind::Checkbox,
                label: LocalizedText::from("Force retrigger"),
                options: None,
                min: None,
                max: None,
                default: Some(json!(false)),
                show_when: None,
                variable_types: Vec::new(),
                exempt_objects: objects(&["consumable"]),
            }],
            applicable_triggers: Some(vec![TriggerId::from("card_scored")]),
            object_users: objects(&["joker", "consumable"]),
        },
    ]
}

// ============================================================================
// SECTION: Builtin Resolvers
// ============================================================================

/// Builds the resolver registry matching the builtin catalog.
///
/// Registers the `poker_hands` computed resolver and the `ranks_for_suit`
/// derived resolver referenced by the builtin tables.
#[must_use]
pub fn builtin_resolvers() -> ResolverRegistry {
    let mut resolvers = ResolverRegistry::new();
    resolvers.register_computed("poker_hands", || {
        POKER_HANDS.iter().map(|hand| option(json!(hand), hand)).collect()
    });
    resolvers.register_derived("ranks_for_suit", |siblings: &ParamValues| {
        // No suit chosen yet: nothing to offer.
        if !siblings.contains_key(&ParamId::from("suit")) {
            return Vec::new();
        }
        CARD_RANKS.iter().map(|rank| option(json!(rank), rank)).collect()
    });
    resolvers
}

// ============================================================================
// SECTION: Construction Helpers
// ============================================================================

/// Builds an object kind list from string literals.
fn objects(kinds: &[&str]) -> Vec<ObjectKind> {
    kinds.iter().copied().map(ObjectKind::from).collect()
}

/// Builds the static suit option list.
fn suit_options() -> Vec<ParamOption> {
    vec![
        option(json!("spades"), "Spades"),
        option(json!("hearts"), "Hearts"),
        option(json!("clubs"), "Clubs"),
        option(json!("diamonds"), "Diamonds"),
    ]
}

/// Builds a plain option.
fn option(value: Value, label: &str) -> ParamOption {
    ParamOption {
        value,
        label: LocalizedText::from(label),
        value_type: None,
        exempt: Vec::new(),
    }
}

/// Builds an option exempt for the listed object kinds.
fn exempt_option(value: Value, label: &str, exempt: &[&str]) -> ParamOption {
    ParamOption {
        value,
        label: LocalizedText::from(label),
        value_type: None,
        exempt: objects(exempt),
    }
}
