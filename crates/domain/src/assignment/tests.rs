use tilgang_core::AppError;

use super::*;

fn user() -> User {
    User {
        id: 1487,
        resource_id: "1487".to_owned(),
        first_name: "Berit".to_owned(),
        last_name: "Andersen".to_owned(),
        user_type: "STUDENT".to_owned(),
        user_name: "berit".to_owned(),
        roles: Vec::new(),
    }
}

fn org_unit(id: i64) -> OrgUnit {
    OrgUnit {
        id,
        name: format!("Unit {id}"),
        organisation_unit_id: id.to_string(),
        parent_ref: "1".to_owned(),
        parent_name: None,
        children_ref: Vec::new(),
    }
}

fn complete_draft() -> AssignmentDraft {
    AssignmentDraft {
        user: Some(user()),
        access_role_id: "ata".to_owned(),
        scope_id: Some(1),
        org_units: vec![org_unit(198)],
        apply_to_all_org_units: false,
    }
}

#[test]
fn complete_draft_validates() {
    let assignment = complete_draft().validate();
    assert_eq!(
        assignment,
        Ok(NewAssignment {
            user_resource_id: "1487".to_owned(),
            access_role_id: "ata".to_owned(),
            scope_id: Some(1),
            org_unit_ids: vec!["198".to_owned()],
            apply_to_all_org_units: false,
        })
    );
}

#[test]
fn draft_without_role_is_rejected() {
    let draft = AssignmentDraft {
        access_role_id: "  ".to_owned(),
        ..complete_draft()
    };
    assert!(matches!(draft.validate(), Err(AppError::Validation(_))));
}

#[test]
fn draft_without_user_is_rejected() {
    let draft = AssignmentDraft {
        user: None,
        ..complete_draft()
    };
    assert!(matches!(draft.validate(), Err(AppError::Validation(_))));
}

#[test]
fn draft_without_org_units_needs_apply_to_all() {
    let mut draft = AssignmentDraft {
        org_units: Vec::new(),
        ..complete_draft()
    };
    assert!(draft.validate().is_err());

    draft.apply_to_all_org_units = true;
    let assignment = draft.validate();
    assert!(assignment.is_ok());
    assert!(
        assignment
            .map(|assignment| assignment.org_unit_ids.is_empty())
            .unwrap_or(false)
    );
}

#[test]
fn org_units_are_not_added_twice() {
    let mut draft = complete_draft();
    assert!(!draft.add_org_unit(org_unit(198)));
    assert!(draft.add_org_unit(org_unit(199)));
    assert!(draft.remove_org_unit(198));
    assert_eq!(draft.org_units.len(), 1);
}

#[test]
fn remove_all_toggle_resolves_to_wildcard() {
    let mut selection = DeleteSelection::for_object_types(&["student".to_owned()]);
    selection.toggle_remove_all();

    assert_eq!(selection.object_type, None);
    assert_eq!(selection.resolve(), Ok(ObjectTypeSelector::All));
    assert_eq!(ObjectTypeSelector::All.as_str(), "*");
}

#[test]
fn specific_selection_keeps_object_type() {
    let selection = DeleteSelection::for_object_types(&["student".to_owned(), "ansatt".to_owned()]);
    assert_eq!(
        selection.resolve(),
        Ok(ObjectTypeSelector::Specific("student".to_owned()))
    );
}

#[test]
fn specific_selection_never_smuggles_the_wildcard() {
    let selection = DeleteSelection {
        remove_all_object_types: false,
        object_type: Some("*".to_owned()),
    };
    assert!(selection.resolve().is_err());

    let empty = DeleteSelection::for_object_types(&[]);
    assert!(empty.resolve().is_err());
}
