//! Provider naming tests

use kaco_exporter::kaco::provider::display_name;

#[test]
fn test_display_name_is_first_host_label() {
    assert_eq!(display_name("kaco.fritz.box"), "kaco");
}

#[test]
fn test_display_name_of_bare_host() {
    assert_eq!(display_name("inverter"), "inverter");
}

#[test]
fn test_display_name_of_ip_address_host() {
    // An IP host degrades to its first octet; operators should prefer a
    // hostname, but this must not panic
    assert_eq!(display_name("192.168.1.40"), "192");
}
