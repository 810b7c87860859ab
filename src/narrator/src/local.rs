use game_core::{ActionBlueprint, ActionOutcome, ActionRequest, BlueprintGenerator, GenerationError};
use rand::seq::IndexedRandom;
use std::collections::HashMap;

/// Offline narration source: a small bank of canned action templates,
/// picked uniformly per request. Used when no API key is configured and
/// by tests that need a generator without a network.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalGenerator;

struct Template {
    phrases: &'static [&'static str],
    scorer: Option<&'static str>,
    assist: Option<&'static str>,
    evaluation: &'static [(&'static str, i8)],
}

impl Template {
    fn to_blueprint(&self, request: ActionRequest) -> ActionBlueprint {
        ActionBlueprint {
            outcome: request.outcome,
            use_var: request.use_var,
            phrases: self.phrases.iter().map(|phrase| phrase.to_string()).collect(),
            player_evaluation: self
                .evaluation
                .iter()
                .map(|(role, delta)| (role.to_string(), *delta))
                .collect::<HashMap<_, _>>(),
            scorer: self.scorer.map(str::to_string),
            assist: self.assist.map(str::to_string),
        }
    }
}

const GOAL_TEMPLATES: &[Template] = &[
    Template {
        phrases: &[
            "{atk_team_name} win the ball back deep in their own half",
            "{atk_3} strides forward and slips it wide to {atk_2}",
            "{atk_2} skips past {def_1} on the touchline",
            "A low cross fizzes across the box",
            "{def_goalkeeper} hesitates",
            "{atk_1} arrives at the near post",
            "{atk_1} turns it in! What a finish!",
            "The {atk_team_name} bench empties in celebration",
        ],
        scorer: Some("atk_1"),
        assist: Some("atk_2"),
        evaluation: &[("atk_1", 3), ("atk_2", 2), ("def_1", -1), ("def_goalkeeper", -1)],
    },
    Template {
        phrases: &[
            "{atk_4} picks the ball up in midfield",
            "A clever one-two with {atk_3} opens the pitch",
            "{def_2} backs off, inviting the shot",
            "{atk_4} lets fly from twenty-five yards",
            "{def_goalkeeper} gets fingertips to it but cannot keep it out",
            "It flies into the top corner! {atk_4} with a thunderbolt!",
        ],
        scorer: Some("atk_4"),
        assist: Some("atk_3"),
        evaluation: &[("atk_4", 3), ("atk_3", 1), ("def_2", -2)],
    },
];

const GOAL_VAR_TEMPLATES: &[Template] = &[Template {
    phrases: &[
        "{atk_2} threads a pass between {def_3} and {def_4}",
        "{atk_1} is through on goal",
        "{atk_1} rounds {def_goalkeeper} and rolls it in",
        "The flag is up! The {referee} is sent to the monitor",
        "The whole of {stadium} holds its breath",
        "The VAR check is over and the goal is confirmed!",
        "{atk_1} was level after all, the goal stands",
    ],
    scorer: Some("atk_1"),
    assist: Some("atk_2"),
    evaluation: &[("atk_1", 3), ("atk_2", 2), ("def_4", -1)],
}];

const NO_GOAL_TEMPLATES: &[Template] = &[
    Template {
        phrases: &[
            "{atk_1} carries the ball towards the edge of the area",
            "{def_3} stands firm and shows him wide",
            "{atk_1} cuts inside and curls one towards the far post",
            "{def_goalkeeper} is equal to it, a fine save at full stretch",
            "The danger passes and {def_team_name} restart from the back",
        ],
        scorer: None,
        assist: None,
        evaluation: &[("def_goalkeeper", 2), ("atk_1", 1)],
    },
    Template {
        phrases: &[
            "A long ball looks for {atk_3} beyond the line",
            "{atk_3} brings it down beautifully",
            "The angle is tight and the shot is rushed",
            "Wide! {atk_3} cannot believe it",
            "Goal kick for {def_team_name}",
        ],
        scorer: None,
        assist: None,
        evaluation: &[("atk_3", -1)],
    },
];

const NO_GOAL_VAR_TEMPLATES: &[Template] = &[Template {
    phrases: &[
        "{atk_2} bundles the ball home at the back post",
        "{atk_team_name} wheel away in celebration",
        "But wait, the {referee} has a hand to the earpiece",
        "The VAR check drags on at {stadium}",
        "No goal! The offside flag is upheld and the effort is ruled out",
        "{def_team_name} breathe again and restart with a free kick",
    ],
    scorer: None,
    assist: None,
    evaluation: &[("atk_2", 1), ("def_goalkeeper", 1)],
}];

const OWN_GOAL_TEMPLATES: &[Template] = &[Template {
    phrases: &[
        "{atk_4} whips a vicious ball across the six-yard box",
        "{def_2} slides in, desperate to clear",
        "The touch is all wrong",
        "It squirms past {def_goalkeeper} and in! An own goal!",
        "{def_2} cannot bear to look, {atk_team_name} take the lead",
    ],
    scorer: Some("def_2"),
    assist: None,
    evaluation: &[("def_2", -3), ("atk_4", 2)],
}];

const PENALTY_TEMPLATES: &[Template] = &[Template {
    phrases: &[
        "{atk_1} dances into the box",
        "{def_4} lunges in recklessly",
        "{atk_1} goes down! The whistle blows at once",
        "The {referee} points to the spot without hesitation",
        "A penalty for {atk_team_name}",
    ],
    scorer: None,
    assist: None,
    evaluation: &[("def_4", -2), ("atk_1", 2)],
}];

const PENALTY_VAR_TEMPLATES: &[Template] = &[Template {
    phrases: &[
        "{atk_3} tumbles under a challenge from {def_1}",
        "Play goes on, but the VAR calls the {referee} to the screen",
        "{stadium} whistles while the replay rolls",
        "The decision is in: the contact was inside the area",
        "Penalty to {atk_team_name}!",
    ],
    scorer: None,
    assist: None,
    evaluation: &[("def_1", -2), ("atk_3", 1)],
}];

fn bank(request: ActionRequest) -> &'static [Template] {
    match (request.outcome, request.use_var) {
        (ActionOutcome::Goal, false) => GOAL_TEMPLATES,
        (ActionOutcome::Goal, true) => GOAL_VAR_TEMPLATES,
        (ActionOutcome::NoGoal, false) => NO_GOAL_TEMPLATES,
        (ActionOutcome::NoGoal, true) => NO_GOAL_VAR_TEMPLATES,
        (ActionOutcome::OwnGoal, _) => OWN_GOAL_TEMPLATES,
        (ActionOutcome::Penalty, false) => PENALTY_TEMPLATES,
        (ActionOutcome::Penalty, true) => PENALTY_VAR_TEMPLATES,
    }
}

impl BlueprintGenerator for LocalGenerator {
    async fn generate(
        &mut self,
        request: ActionRequest,
    ) -> Result<ActionBlueprint, GenerationError> {
        let template = bank(request)
            .choose(&mut rand::rng())
            .ok_or_else(|| GenerationError::Malformed("empty template bank".to_string()))?;

        Ok(template.to_blueprint(request))
    }
}
