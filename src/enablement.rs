use crate::model::{Net, TokenTransfer};

/// A transition is enabled when every input place holds at least its arc weight.
/// Parallel arcs from the same place add up. Transitions without input arcs are
/// always enabled; unknown ids and places never are.
pub fn is_enabled(net: &Net, transition_id: &str) -> bool {
    if net.find_transition(transition_id).is_none() {
        return false;
    }
    input_totals(net, transition_id)
        .iter()
        .all(|(place_id, required)| match (net.tokens(place_id), required) {
            (Some(tokens), Some(required)) => tokens >= *required,
            _ => false,
        })
}

/// Tokens a firing withdraws from each input place, in arc order. `None` when
/// the arcs from some place ask for more tokens than a place can ever hold.
pub fn required_tokens(net: &Net, transition_id: &str) -> Option<Vec<TokenTransfer>> {
    input_totals(net, transition_id)
        .into_iter()
        .map(|(place_id, tokens)| Some(TokenTransfer { place_id, tokens: tokens? }))
        .collect()
}

/// Input places that lack tokens, as (place id, tokens held, tokens required).
/// A requirement that does not fit in a `u64` is reported as `u64::MAX`.
pub fn shortfalls(net: &Net, transition_id: &str) -> Vec<(String, u64, u64)> {
    input_totals(net, transition_id)
        .into_iter()
        .filter_map(|(place_id, required)| {
            let held = net.tokens(&place_id).unwrap_or(0);
            let short = required.map_or(true, |required| held < required);
            short.then(|| (place_id, held, required.unwrap_or(u64::MAX)))
        })
        .collect()
}

// Summed input weight per place; `None` once the sum overflows.
fn input_totals(net: &Net, transition_id: &str) -> Vec<(String, Option<u64>)> {
    let mut totals: Vec<(String, Option<u64>)> = Vec::new();
    for arc in net.input_arcs(transition_id) {
        match totals.iter_mut().find(|(place_id, _)| *place_id == arc.source) {
            Some((_, total)) => *total = total.and_then(|t| t.checked_add(arc.data.weight)),
            None => totals.push((arc.source.clone(), Some(arc.data.weight))),
        }
    }
    totals
}
