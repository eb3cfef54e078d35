use std::collections::HashMap;

use syncline_protocol::{Event, EventPair, PairKind, SharedStr};

#[derive(Default)]
struct Open<'a> {
    created: Vec<&'a Event>,
    locked: Vec<&'a Event>,
    barrier: Option<&'a Event>,
}

/// Derive synchronization pairs from events sorted by timestamp.
///
/// Matching is per pairing key. A `mutex_unlock` closes the most recent open
/// `mutex_lock` (a critical section), falling back to the most recent open
/// `mutex_create` (a signal). A `barrier_create` pairs with every later
/// `barrier_wait` on the same key. Pairs come out in the order their closing
/// event is seen; events that never close are dropped.
///
/// Also returns how many synchronization events were considered.
pub fn find_pairs(events: &[Event]) -> (Vec<EventPair>, usize) {
    let mut open: HashMap<&SharedStr, Open<'_>> = HashMap::new();
    let mut pairs = Vec::new();
    let mut considered = 0;

    for event in events {
        let (Some(name), Some(key)) = (&event.event_name, &event.pairing_key) else {
            continue;
        };
        let slot = open.entry(key).or_default();

        match name.as_str() {
            "mutex_create" => slot.created.push(event),
            "mutex_lock" => slot.locked.push(event),
            "barrier_create" => slot.barrier = Some(event),
            "mutex_unlock" => {
                let matched = match slot.locked.pop() {
                    Some(lock) => Some((PairKind::LockUnlock, lock)),
                    None => slot
                        .created
                        .pop()
                        .map(|create| (PairKind::SignalCreateUnlock, create)),
                };
                match matched {
                    Some((kind, start)) => pairs.push(pair(kind, key, start, event)),
                    None => tracing::debug!(pairing_key = %key, "unlock without open lock or create"),
                }
            }
            "barrier_wait" => match slot.barrier {
                Some(create) => pairs.push(pair(PairKind::BarrierCreateWait, key, create, event)),
                None => tracing::debug!(pairing_key = %key, "barrier wait before create"),
            },
            _ => continue,
        }
        considered += 1;
    }

    (pairs, considered)
}

fn pair(kind: PairKind, key: &SharedStr, start: &Event, end: &Event) -> EventPair {
    EventPair {
        kind,
        pairing_key: key.clone(),
        start_event: start.clone(),
        end_event: end.clone(),
    }
}
