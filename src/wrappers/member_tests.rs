use pretty_assertions::assert_eq;

use super::member::getter_property_name;

#[test]
fn get_prefix_is_stripped_and_decapitalized() {
    assert_eq!(getter_property_name("getName"), Some("name".to_string()));
    assert_eq!(getter_property_name("getOrderItems"), Some("orderItems".to_string()));
}

#[test]
fn is_prefix_is_stripped_and_decapitalized() {
    assert_eq!(getter_property_name("isActive"), Some("active".to_string()));
}

#[test]
fn leading_acronyms_keep_their_case() {
    assert_eq!(getter_property_name("getURL"), Some("URL".to_string()));
    assert_eq!(getter_property_name("getID"), Some("ID".to_string()));
}

#[test]
fn non_accessor_names_are_rejected() {
    assert_eq!(getter_property_name("compute"), None);
    assert_eq!(getter_property_name("name"), None);
}

#[test]
fn bare_prefixes_are_rejected() {
    assert_eq!(getter_property_name("get"), None);
    assert_eq!(getter_property_name("is"), None);
}

#[test]
fn is_inside_a_longer_name_still_counts() {
    // "isolate" starts with "is"; the convention strips it regardless.
    assert_eq!(getter_property_name("isolate"), Some("olate".to_string()));
}
