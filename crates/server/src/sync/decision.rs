use serde::Serialize;

use crate::aggregate::AlertAggregate;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeDecision {
    Update,
    Skip,
}

/// Decides whether `incoming` should overwrite `local`.
///
/// Only the modification time and the display fields are compared. Nested parts
/// (configuration, schedule, tags, queries) are assumed to move together with
/// `last_modified_time`.
pub fn decide(local: &AlertAggregate, incoming: &AlertAggregate) -> ChangeDecision {
    let stale = match (local.last_modified_time, incoming.last_modified_time) {
        (Some(a), Some(b)) => a != b,
        _ => true,
    };
    if stale
        || local.display_name != incoming.display_name
        || local.status != incoming.status
        || local.description != incoming.description
    {
        ChangeDecision::Update
    } else {
        ChangeDecision::Skip
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::AlertStatus;

    fn alert(modified: Option<i64>) -> AlertAggregate {
        AlertAggregate {
            last_modified_time: modified,
            ..AlertAggregate::new("cpu-high", "A")
        }
    }

    #[test]
    fn identical_copies_are_skipped() {
        assert_eq!(decide(&alert(Some(100)), &alert(Some(100))), ChangeDecision::Skip);
    }

    #[test]
    fn description_appearing_forces_update() {
        let mut incoming = alert(Some(100));
        incoming.description = Some("now described".into());
        assert_eq!(decide(&alert(Some(100)), &incoming), ChangeDecision::Update);
        // and the other way round
        assert_eq!(decide(&incoming, &alert(Some(100))), ChangeDecision::Update);
    }

    #[test]
    fn missing_timestamp_on_either_side_forces_update() {
        assert_eq!(decide(&alert(None), &alert(Some(100))), ChangeDecision::Update);
        assert_eq!(decide(&alert(Some(100)), &alert(None)), ChangeDecision::Update);
        assert_eq!(decide(&alert(None), &alert(None)), ChangeDecision::Update);
    }

    #[test]
    fn compared_fields_each_trigger_update() {
        let local = alert(Some(100));

        assert_eq!(decide(&local, &alert(Some(101))), ChangeDecision::Update);

        let mut renamed = alert(Some(100));
        renamed.display_name = "B".into();
        assert_eq!(decide(&local, &renamed), ChangeDecision::Update);

        let mut disabled = alert(Some(100));
        disabled.status = AlertStatus::Disabled;
        assert_eq!(decide(&local, &disabled), ChangeDecision::Update);
    }

    #[test]
    fn nested_changes_alone_are_not_detected() {
        let mut incoming = alert(Some(100));
        incoming.tags.push(crate::aggregate::Tag::label("new"));
        assert_eq!(decide(&alert(Some(100)), &incoming), ChangeDecision::Skip);
    }
}
