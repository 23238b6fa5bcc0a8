use super::*;

#[test]
fn it_looks_up_registered_names_only() {
    let registry = CatalogRegistry::builtin();

    let descriptor = registry.lookup("london-datastore").unwrap();
    assert_eq!(descriptor.protocol, Protocol::Ckan);
    assert_eq!(descriptor.endpoint, "https://data.london.gov.uk");

    assert_eq!(registry.lookup(" Paris ").map(|d| d.protocol), Some(Protocol::OpenDataSoft));
    assert!(registry.lookup("london").is_none());
    assert!(registry.lookup("").is_none());
}

#[test]
fn it_groups_names_by_protocol_in_order() {
    let grouped = CatalogRegistry::builtin().list_by_protocol();

    assert_eq!(
        grouped[&Protocol::Ckan],
        vec!["humanitarian", "london-datastore", "open-africa", "subak", "uk-gov"]
    );
    assert_eq!(grouped[&Protocol::GouvFr], vec!["french-gov"]);
    for names in grouped.values() {
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(&sorted, names);
    }
}

#[test]
fn it_formats_list_grouped_under_headers() {
    let registry = CatalogRegistry::builtin();
    let text = registry.format_list().plain_text();

    insta::assert_snapshot!(text, @r###"
    Available Catalogs:

    CKAN Catalogs:
    - humanitarian: https://data.humdata.org
    - london-datastore: https://data.london.gov.uk
    - open-africa: https://open.africa
    - subak: https://data.subak.org
    - uk-gov: https://data.gov.uk

    OpenDataSoft Catalogs:
    - cadent-gas: https://cadentgas.opendatasoft.com
    - edf-energy: https://opendata.edf.fr
    - elia-energy: https://opendata.elia.be
    - grd-france: https://opendata.agenceore.fr
    - infrabel: https://opendata.infrabel.be
    - paris: https://opendata.paris.fr
    - toulouse: https://data.toulouse-metropole.fr
    - uk-power-networks: https://ukpowernetworks.opendatasoft.com

    French Government Catalogs:
    - french-gov: https://www.data.gouv.fr
    "###);
}

#[test]
fn it_adds_custom_catalogs() {
    let registry = CatalogRegistry::builtin()
        .with_custom(vec![CatalogDescriptor::new(
            "Bristol",
            Protocol::OpenDataSoft,
            "https://opendata.bristol.gov.uk",
        )])
        .unwrap();

    assert_eq!(registry.len(), 15);
    assert_eq!(
        registry.lookup("bristol").map(|d| d.endpoint.as_str()),
        Some("https://opendata.bristol.gov.uk")
    );
}

#[test]
fn it_rejects_duplicate_names() {
    let res = CatalogRegistry::builtin().with_custom(vec![CatalogDescriptor::new(
        "Paris",
        Protocol::Ckan,
        "https://example.org",
    )]);

    assert_eq!(
        res.unwrap_err().to_string(),
        "Catalog 'paris' is already registered and cannot be redefined"
    );
}
