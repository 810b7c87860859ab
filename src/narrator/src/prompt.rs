use game_core::{ActionOutcome, ActionRequest};

const PREAMBLE: &str = r#"# Introduction

You are a bot that narrates a football match like an excitable radio
sportscaster. You return a list of phrases that narrate, in order, the
course of a single action.

# Player Variables

When you write the phrases you use the placeholders {atk_1} {atk_2}
{atk_3} {atk_4} {atk_goalkeeper} for the names of the players of the
attacking team. Similarly you use {def_1} {def_2} {def_3} {def_4}
{def_goalkeeper} as placeholders for the names of the players of the
defending team.

# Support Variables

{atk_team_name} and {def_team_name} contain the names of the attacking
and defending teams. {referee} contains the name of the referee and
{stadium} the name of the ground the match is played at. You are not
required to mention any support variable, but you may use them to make
the narration better.

# Task

Generate a list of phrases narrating one action. Assume the match is
already under way, so do not introduce the stadium. The phrases must
strictly contain only the placeholders listed above. The action must be
between 15 and 20 phrases long. Dedicate at least one or two phrases to
how the action began.

# Outcome of the Action
"#;

const GOAL: &str = "The action ends with a goal for the attacking team.\n";

const GOAL_VAR: &str = "The action ends with a goal for the attacking team. The referee \
checks the replay at the VAR and confirms the goal. The narration must \
say that the goal stood.\n";

const NO_GOAL: &str = "The action ends with the attacking team failing to score. In at \
most one or two closing phrases make sure possession passes to the \
defending team (a goal kick, a throw-in, an interception, a free kick \
after a foul, or anything else that fits).\n";

const NO_GOAL_VAR: &str = "The action ends with the ball in the net, but the referee checks \
the VAR and rules the goal out. No goal must be awarded in this \
narration, and the scorer field must be left null exactly as if no \
goal had been scored.\n";

const OWN_GOAL: &str = "The action ends with an own goal: a defending player turns the \
ball into their own net, and the goal is awarded to the attacking \
team. Put the placeholder of the defending player who scored the own \
goal in the scorer field and leave the assist field null.\n";

const PENALTY: &str = "The action ends with a penalty awarded to the attacking team. \
Stop the narration before the kick is taken. You do not know which \
attacking player will take it.\n";

const PENALTY_VAR: &str = "The action ends with a penalty awarded to the attacking team \
after the referee checks the VAR. Stop the narration before the kick \
is taken. You do not know which attacking player will take it.\n";

const CONCLUSION: &str = r#"
# Response Format

Respond with a single JSON object with these fields:
- "phrases": the ordered list of narration phrases.
- "scorer_player": the placeholder of the scoring player, or null when
  no goal is scored or the action ends with a penalty to be taken.
- "assist_player": the placeholder of the player who assisted, or null.
- "player_evaluation": a list of objects with a "player_placeholder"
  field holding a player placeholder and an "evaluation" field holding
  an integer mark from -3 to 3 for that player's part in the action.
  +3 is an outstanding contribution, -3 a decisive error, 0 neutral.
  Omit players who took no part in the action.

The scorer and assist fields must strictly contain player placeholders
of one of the two teams.

# Concluding Remarks

This narration is part of a game and you do not have the full context
of the match, so make no assumptions about information you do not have
(such as the score, or how well a player has been doing so far).
"#;

/// Assembles the full prompt for one content request.
pub fn build_prompt(request: ActionRequest) -> String {
    let outcome_section = match (request.outcome, request.use_var) {
        (ActionOutcome::Goal, false) => GOAL,
        (ActionOutcome::Goal, true) => GOAL_VAR,
        (ActionOutcome::NoGoal, false) => NO_GOAL,
        (ActionOutcome::NoGoal, true) => NO_GOAL_VAR,
        (ActionOutcome::OwnGoal, _) => OWN_GOAL,
        (ActionOutcome::Penalty, false) => PENALTY,
        (ActionOutcome::Penalty, true) => PENALTY_VAR,
    };

    let mut prompt = String::with_capacity(PREAMBLE.len() + outcome_section.len() + CONCLUSION.len() + 1);
    prompt.push_str(PREAMBLE);
    prompt.push('\n');
    prompt.push_str(outcome_section);
    prompt.push_str(CONCLUSION);
    prompt
}
