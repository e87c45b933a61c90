// rule-forge-core/tests/common/mod.rs
// ============================================================================
// Module: Core Test Fixtures
// Description: Shared registry, resolvers, and rule builders for core tests.
// ============================================================================
//! ## Overview
//! A minimal fixture registry covering every validation path: trigger
//! restrictions, object users, static/computed/derived options, exemptions,
//! visibility gates, and variable kind restrictions.

#![allow(dead_code, reason = "Each integration test uses a subset of the fixtures.")]

use rule_forge_core::Condition;
use rule_forge_core::ConditionGroup;
use rule_forge_core::ConditionTypeDefinition;
use rule_forge_core::DefinitionRegistry;
use rule_forge_core::Effect;
use rule_forge_core::GroupOperator;
use rule_forge_core::EffectSlot;
use rule_forge_core::EffectTypeDefinition;
use rule_forge_core::LocalizedText;
use rule_forge_core::NodeId;
use rule_forge_core::ObjectKind;
use rule_forge_core::OptionsSource;
use rule_forge_core::ParamId;
use rule_forge_core::ParamOption;
use rule_forge_core::ParamValues;
use rule_forge_core::ParameterDefinition;
use rule_forge_core::ParameterKind;
use rule_forge_core::ResolverRegistry;
use rule_forge_core::Rule;
use rule_forge_core::ShowWhen;
use rule_forge_core::TriggerDefinition;
use rule_forge_core::TriggerId;
use rule_forge_core::ValueCell;
use serde_json::json;

/// Returns the joker object kind.
pub fn joker() -> ObjectKind {
    ObjectKind::from("joker")
}

/// Returns the consumable object kind.
pub fn consumable() -> ObjectKind {
    ObjectKind::from("consumable")
}

/// Returns the voucher object kind, absent from every fixture definition.
pub fn voucher() -> ObjectKind {
    ObjectKind::from("voucher")
}

/// Builds a parameter definition with the common fields defaulted.
pub fn param(id: &str, kind: ParameterKind) -> ParameterDefinition {
    ParameterDefinition {
        id: ParamId::from(id),
        kind,
        label: LocalizedText::from(id),
        options: None,
        min: None,
        max: None,
        default: None,
        show_when: None,
        variable_types: Vec::new(),
        exempt_objects: Vec::new(),
    }
}

/// Builds a plain option.
pub fn opt(value: &str) -> ParamOption {
    ParamOption {
        value: json!(value),
        label: LocalizedText::from(value),
        value_type: None,
        exempt: Vec::new(),
    }
}

/// Builds an option exempt for the listed object kinds.
pub fn exempt_opt(value: &str, exempt: &[&str]) -> ParamOption {
    ParamOption {
        value: json!(value),
        label: LocalizedText::from(value),
        value_type: None,
        exempt: exempt.iter().copied().map(ObjectKind::from).collect(),
    }
}

/// Builds the fixture registry.
pub fn registry() -> DefinitionRegistry {
    let triggers = vec![
        TriggerDefinition {
            id: TriggerId::from("hand_played"),
            label: LocalizedText::from("Hand played"),
            description: LocalizedText::new(),
            category: None,
            object_users: vec![joker()],
        },
        TriggerDefinition {
            id: TriggerId::from("card_scored"),
            label: LocalizedText::from("Card scored"),
            description: LocalizedText::new(),
            category: None,
            object_users: vec![joker(), consumable()],
        },
    ];

    let conditions = vec![
        ConditionTypeDefinition {
            id: "contains_pair".into(),
            label: LocalizedText::from("Contains pair"),
            description: LocalizedText::new(),
            category: None,
            params: Vec::new(),
            applicable_triggers: Some(vec![TriggerId::from("hand_played")]),
            object_users: vec![joker()],
        },
        ConditionTypeDefinition {
            id: "card_suit".into(),
            label: LocalizedText::from("Card suit"),
            description: LocalizedText::new(),
            category: None,
            params: vec![{
                let mut suit = param("suit", ParameterKind::Select);
                suit.options = Some(OptionsSource::Static {
                    options: vec![
                        opt("spades"),
                        opt("hearts"),
                        exempt_opt("wild", &["consumable"]),
                    ],
                });
                suit.variable_types = vec!["suit".into()];
                suit
            }],
            applicable_triggers: Some(vec![TriggerId::from("card_scored")]),
            object_users: vec![joker(), consumable()],
        },
        ConditionTypeDefinition {
            id: "poker_hand".into(),
            label: LocalizedText::from("Poker hand"),
            description: LocalizedText::new(),
            category: None,
            params: vec![{
                let mut hand = param("hand", ParameterKind::Select);
                hand.options = Some(OptionsSource::Computed {
                    resolver: "poker_hands".into(),
                });
                hand.variable_types = vec!["pokerhand".into()];
                hand
            }],
            applicable_triggers: Some(vec![TriggerId::from("hand_played")]),
            object_users: vec![joker()],
        },
        ConditionTypeDefinition {
            id: "card_rank".into(),
            label: LocalizedText::from("Card rank"),
            description: LocalizedText::new(),
            category: None,
            params: vec![
                {
                    let mut suit = param("suit", ParameterKind::Select);
                    suit.options = Some(OptionsSource::Static {
                        options: vec![opt("spades"), opt("hearts")],
                    });
                    suit
                },
                {
                    let mut rank = param("rank", ParameterKind::Select);
                    rank.options = Some(OptionsSource::Derived {
                        resolver: "ranks_for_suit".into(),
                    });
                    rank.variable_types = vec!["rank".into()];
                    rank
                },
            ],
            applicable_triggers: Some(vec![TriggerId::from("card_scored")]),
            object_users: vec![joker()],
        },
    ];

    let effects = vec![
        EffectTypeDefinition {
            id: "add_mult".into(),
            label: LocalizedText::from("Add mult"),
            description: LocalizedText::new(),
            category: None,
            params: vec![{
                let mut amount = param("amount", ParameterKind::Number);
                amount.min = Some(0.0);
                amount.max = Some(100.0);
                amount.default = Some(json!(4));
                amount.variable_types = vec!["mult".into()];
                amount
            }],
            applicable_triggers: Some(vec![
                TriggerId::from("hand_played"),
                TriggerId::from("card_scored"),
            ]),
            object_users: vec![joker()],
        },
        EffectTypeDefinition {
            id: "destroy_card".into(),
            label: LocalizedText::from("Destroy card"),
            description: LocalizedText::new(),
            category: None,
            params: Vec::new(),
            applicable_triggers: Some(vec![TriggerId::from("card_scored")]),
            object_users: vec![joker(), consumable()],
        },
        EffectTypeDefinition {
            id: "set_counter".into(),
            label: LocalizedText::from("Set counter"),
            description: LocalizedText::new(),
            category: None,
            params: vec![
                {
                    let mut mode = param("mode", ParameterKind::Select);
                    mode.options = Some(OptionsSource::Static {
                        options: vec![opt("set"), opt("add"), opt("reset")],
                    });
                    mode
                },
                {
                    let mut value = param("value", ParameterKind::Number);
                    value.min = Some(-100.0);
                    value.max = Some(100.0);
                    value.show_when = Some(ShowWhen {
                        parameter: ParamId::from("mode"),
                        values: vec!["set".to_owned(), "add".to_owned()],
                    });
                    value.variable_types = vec!["counter".into()];
                    value
                },
                {
                    let mut bonus = param("bonus", ParameterKind::Number);
                    bonus.exempt_objects = vec![consumable()];
                    bonus
                },
            ],
            applicable_triggers: None,
            object_users: vec![joker(), consumable()],
        },
    ];

    DefinitionRegistry::new(triggers, conditions, effects)
}

/// Builds the resolver registry matching the fixture catalog.
pub fn resolvers() -> ResolverRegistry {
    let mut resolvers = ResolverRegistry::new();
    resolvers.register_computed("poker_hands", || vec![opt("pair"), opt("flush")]);
    resolvers.register_derived("ranks_for_suit", |siblings: &ParamValues| {
        if siblings.contains_key(&ParamId::from("suit")) {
            vec![opt("A"), opt("K")]
        } else {
            Vec::new()
        }
    });
    resolvers
}

/// Builds a condition node without parameters.
pub fn condition(id: &str, condition_type: &str) -> Condition {
    Condition {
        id: NodeId::from(id),
        condition_type: condition_type.into(),
        negate: false,
        params: ParamValues::new(),
        operator: None,
    }
}

/// Builds an effect node without parameters.
pub fn effect(id: &str, effect_type: &str) -> Effect {
    Effect {
        id: NodeId::from(id),
        effect_type: effect_type.into(),
        params: ParamValues::new(),
        custom_message: None,
    }
}

/// Builds the canonical pair rule: on hand played, if the hand contains a
/// pair, add four mult.
pub fn pair_rule() -> Rule {
    let mut amount_params = ParamValues::new();
    amount_params.insert(ParamId::from("amount"), ValueCell::number(4.0));

    let mut add_mult = effect("e1", "add_mult");
    add_mult.params = amount_params;

    let mut rule = Rule::new(NodeId::from("r1"), TriggerId::from("hand_played"));
    rule.condition_groups = vec![ConditionGroup {
        id: NodeId::from("g1"),
        operator: GroupOperator::And,
        conditions: vec![condition("c1", "contains_pair")],
    }];
    rule.slots = vec![EffectSlot::Effect(add_mult)];
    rule
}
