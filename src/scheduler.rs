use crate::model::Net;

/// Committed transitions whose delay has elapsed at `time`, in node order.
pub fn due_transitions(net: &Net, time: u64) -> Vec<String> {
    net.transitions()
        .filter(|t| t.data.due_time().is_some_and(|due| time >= due))
        .map(|t| t.id.clone())
        .collect()
}

/// Earliest clock value at which some committed transition becomes due.
pub fn next_due_time(net: &Net) -> Option<u64> {
    net.transitions().filter_map(|t| t.data.due_time()).min()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Node, Position, Transition, TransitionData};

    fn committed(id: &str, activation_time: u64, delay: u64) -> Node {
        Node::Transition(Transition {
            id: id.to_string(),
            position: Position::default(),
            data: TransitionData {
                waiting: true,
                tokens_removed: true,
                activation_time: Some(activation_time),
                delay,
                ..TransitionData::default()
            },
        })
    }

    #[test]
    fn picks_elapsed_transitions_in_node_order() {
        let net = Net {
            nodes: vec![
                committed("transition-0", 0, 5),
                committed("transition-1", 1, 1),
                committed("transition-2", 0, 2),
            ],
            arcs: vec![],
        };
        assert_eq!(due_transitions(&net, 1), Vec::<String>::new());
        assert_eq!(due_transitions(&net, 2), vec!["transition-1", "transition-2"]);
        assert_eq!(due_transitions(&net, 9).len(), 3);
        assert_eq!(next_due_time(&net), Some(2));
    }

    #[test]
    fn ignores_uncommitted_transitions() {
        let mut node = committed("transition-0", 0, 0);
        if let Node::Transition(t) = &mut node {
            t.data.tokens_removed = false;
        }
        let net = Net {
            nodes: vec![node],
            arcs: vec![],
        };
        assert!(due_transitions(&net, 10).is_empty());
        assert_eq!(next_due_time(&net), None);
    }
}
