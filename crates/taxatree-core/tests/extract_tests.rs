use taxatree_core::{extract, extract_chains, Ancestor, Observation, TaxonRank, Taxon};

fn ancestor(id: u64, name: &str, rank: &str) -> Ancestor {
    Ancestor {
        id,
        name: Some(name.to_string()),
        rank: rank.to_string(),
        preferred_common_name: None,
    }
}

fn lion_observation() -> Observation {
    Observation {
        id: 1001,
        taxon: Some(Taxon {
            id: Some(42048),
            name: "Panthera leo".to_string(),
            rank: "species".to_string(),
            preferred_common_name: Some("Lion".to_string()),
            ancestors: Some(vec![
                ancestor(1, "Animalia", "kingdom"),
                ancestor(2, "Chordata", "phylum"),
                ancestor(40151, "Mammalia", "class"),
                ancestor(41573, "Carnivora", "order"),
                ancestor(41660, "Felidae", "family"),
                ancestor(41964, "Panthera", "genus"),
            ]),
            ..Taxon::default()
        }),
        ..Observation::default()
    }
}

#[test]
fn test_extract_six_ancestor_links() {
    let chain = extract(&lion_observation()).unwrap();

    assert_eq!(chain.ancestors.len(), 6);
    let ranks: Vec<TaxonRank> = chain.ancestors.iter().map(|l| l.rank).collect();
    assert_eq!(ranks, TaxonRank::ANCESTORS);

    assert_eq!(chain.ancestors[0].taxon_id, Some(1));
    assert_eq!(chain.ancestors[0].name, "Animalia");
    assert_eq!(chain.ancestors[5].taxon_id, Some(41964));
    assert_eq!(chain.ancestors[5].name, "Panthera");
}

#[test]
fn test_extract_species_from_own_taxon() {
    let chain = extract(&lion_observation()).unwrap();

    assert_eq!(chain.species.taxon_id, 42048);
    assert_eq!(chain.species.name, "Panthera leo");
    assert_eq!(chain.species.common_name, "Lion");
}

#[test]
fn test_extract_falls_back_to_flat_fields() {
    // No expanded ancestors: ids come from the positional list, names
    // from the per-rank fields.
    let observation = Observation {
        id: 1002,
        taxon: Some(Taxon {
            id: Some(42048),
            name: "Panthera leo".to_string(),
            ancestor_ids: vec![1, 2, 40151, 41573, 41660, 41964],
            kingdom_name: Some("Animalia".to_string()),
            phylum_name: Some("Chordata".to_string()),
            class_name: Some("Mammalia".to_string()),
            order_name: Some("Carnivora".to_string()),
            family_name: Some("Felidae".to_string()),
            genus_name: Some("Panthera".to_string()),
            ..Taxon::default()
        }),
        ..Observation::default()
    };

    let chain = extract(&observation).unwrap();

    assert_eq!(chain.ancestors[2].taxon_id, Some(40151));
    assert_eq!(chain.ancestors[2].name, "Mammalia");
    assert_eq!(chain.ancestors[5].taxon_id, Some(41964));
    assert_eq!(chain.ancestors[5].name, "Panthera");
}

#[test]
fn test_extract_id_and_name_resolve_independently() {
    // Short ancestor_ids but full names: deep ranks keep their name
    // with an absent id.
    let observation = Observation {
        id: 1003,
        taxon: Some(Taxon {
            id: Some(42048),
            name: "Panthera leo".to_string(),
            ancestor_ids: vec![1, 2],
            kingdom_name: Some("Animalia".to_string()),
            phylum_name: Some("Chordata".to_string()),
            class_name: Some("Mammalia".to_string()),
            ..Taxon::default()
        }),
        ..Observation::default()
    };

    let chain = extract(&observation).unwrap();

    assert_eq!(chain.ancestors[1].taxon_id, Some(2));
    assert_eq!(chain.ancestors[1].name, "Chordata");
    assert_eq!(chain.ancestors[2].taxon_id, None);
    assert_eq!(chain.ancestors[2].name, "Mammalia");
    assert_eq!(chain.ancestors[3].taxon_id, None);
    assert_eq!(chain.ancestors[3].name, "");
}

#[test]
fn test_extract_unresolvable_rank_is_kept_absent() {
    let observation = Observation {
        id: 1004,
        taxon: Some(Taxon {
            id: Some(42048),
            name: "Panthera leo".to_string(),
            ..Taxon::default()
        }),
        ..Observation::default()
    };

    let chain = extract(&observation).unwrap();

    // All six links are still present, just without ids.
    assert_eq!(chain.ancestors.len(), 6);
    assert!(chain.ancestors.iter().all(|l| l.taxon_id.is_none()));
    assert_eq!(chain.species.taxon_id, 42048);
}

#[test]
fn test_extract_ignores_non_major_ancestor_ranks() {
    let observation = Observation {
        id: 1005,
        taxon: Some(Taxon {
            id: Some(42048),
            name: "Panthera leo".to_string(),
            ancestors: Some(vec![
                ancestor(1, "Animalia", "kingdom"),
                ancestor(372739, "Theria", "subclass"),
                ancestor(40151, "Mammalia", "class"),
                ancestor(41944, "Pantherinae", "subfamily"),
                ancestor(41964, "Panthera", "genus"),
            ]),
            ..Taxon::default()
        }),
        ..Observation::default()
    };

    let chain = extract(&observation).unwrap();

    assert_eq!(chain.ancestors[0].taxon_id, Some(1));
    assert_eq!(chain.ancestors[2].taxon_id, Some(40151));
    assert_eq!(chain.ancestors[5].taxon_id, Some(41964));
    // Subclass and subfamily entries resolve nothing by themselves.
    assert_eq!(chain.ancestors[1].taxon_id, None);
    assert_eq!(chain.ancestors[4].taxon_id, None);
}

#[test]
fn test_extract_prefers_expanded_ancestors_over_flat_fields() {
    let observation = Observation {
        id: 1006,
        taxon: Some(Taxon {
            id: Some(42048),
            name: "Panthera leo".to_string(),
            ancestors: Some(vec![ancestor(1, "Animalia", "kingdom")]),
            ancestor_ids: vec![999],
            kingdom_name: Some("Wrongia".to_string()),
            ..Taxon::default()
        }),
        ..Observation::default()
    };

    let chain = extract(&observation).unwrap();

    assert_eq!(chain.ancestors[0].taxon_id, Some(1));
    assert_eq!(chain.ancestors[0].name, "Animalia");
}

#[test]
fn test_extract_missing_taxon_is_malformed() {
    let observation = Observation {
        id: 1007,
        ..Observation::default()
    };

    assert!(extract(&observation).is_err());
}

#[test]
fn test_extract_zero_taxon_id_is_malformed() {
    let observation = Observation {
        id: 1008,
        taxon: Some(Taxon {
            id: Some(0),
            name: "Ghost".to_string(),
            ..Taxon::default()
        }),
        ..Observation::default()
    };

    assert!(extract(&observation).is_err());
}

#[test]
fn test_extract_chains_skips_malformed() {
    let observations = vec![
        lion_observation(),
        Observation {
            id: 1009,
            ..Observation::default()
        },
        lion_observation(),
    ];

    let chains = extract_chains(&observations);
    assert_eq!(chains.len(), 2);
}

#[test]
fn test_extract_common_name_defaults_to_empty() {
    let observation = Observation {
        id: 1010,
        taxon: Some(Taxon {
            id: Some(7),
            name: "Obscura species".to_string(),
            ..Taxon::default()
        }),
        ..Observation::default()
    };

    let chain = extract(&observation).unwrap();
    assert_eq!(chain.species.common_name, "");
}
