//! Network descriptor validation tests

use signal_timing::simulation::{
    build_network, Displacement, LaneId, LaneRecord, Movement, NetworkDescriptor, SignalError,
};

fn descriptor(lanes: Vec<LaneRecord>) -> NetworkDescriptor {
    NetworkDescriptor {
        lanes,
        ..NetworkDescriptor::default()
    }
}

#[test]
fn test_demo_network_builds() {
    let network = build_network(&NetworkDescriptor::two_lane_demo()).unwrap();

    assert_eq!(network.len(), 2);
    assert_eq!(network.lane_id("v1"), Some(LaneId(0)));
    assert_eq!(network.lane_id("v2"), Some(LaneId(1)));

    let v1 = network.lane(LaneId(0)).unwrap();
    assert_eq!(v1.light.cycle(), 55.0);
    assert_eq!(v1.mean_interarrival, Some(8.8));
    assert!(v1.is_source());
}

#[test]
fn test_json_defaults() {
    let text = r#"{ "lanes": [ { "id": "a" }, { "id": "b", "mean_interarrival": 12.5, "offset": 4 } ] }"#;
    let network = build_network(&NetworkDescriptor::from_json(text).unwrap()).unwrap();

    let a = network.lane(LaneId(0)).unwrap();
    assert_eq!(a.light.green, 30.0);
    assert_eq!(a.light.red, 30.0);
    assert_eq!(a.light.offset, 0.0);
    assert!(!a.is_source());

    let b = network.lane(LaneId(1)).unwrap();
    assert_eq!(b.mean_interarrival, Some(12.5));
    assert_eq!(b.light.offset, 4.0);
}

#[test]
fn test_missing_id_is_rejected() {
    let text = r#"{ "lanes": [ { "green": 10, "red": 5 } ] }"#;
    let parsed = NetworkDescriptor::from_json(text).unwrap();
    assert!(matches!(
        build_network(&parsed),
        Err(SignalError::InvalidDescriptor(_))
    ));

    let blank = descriptor(vec![LaneRecord::new("  ", None, 10.0, 5.0)]);
    assert!(matches!(
        build_network(&blank),
        Err(SignalError::InvalidDescriptor(_))
    ));
}

#[test]
fn test_non_positive_green_is_rejected() {
    for green in [0.0, -3.0, f64::NAN] {
        let result = build_network(&descriptor(vec![LaneRecord::new("a", None, green, 5.0)]));
        assert!(
            matches!(result, Err(SignalError::InvalidDescriptor(_))),
            "green {} accepted",
            green
        );
    }
}

#[test]
fn test_negative_red_is_rejected() {
    let result = build_network(&descriptor(vec![LaneRecord::new("a", None, 10.0, -1.0)]));
    assert!(matches!(result, Err(SignalError::InvalidDescriptor(_))));

    // Zero red is an always-green light
    assert!(build_network(&descriptor(vec![LaneRecord::new("a", None, 10.0, 0.0)])).is_ok());
}

#[test]
fn test_bad_interarrival_is_rejected() {
    let result = build_network(&descriptor(vec![LaneRecord::new("a", Some(0.0), 10.0, 5.0)]));
    assert!(matches!(result, Err(SignalError::InvalidDescriptor(_))));
}

#[test]
fn test_duplicate_ids_are_rejected() {
    let result = build_network(&descriptor(vec![
        LaneRecord::new("a", None, 10.0, 5.0),
        LaneRecord::new("a", Some(3.0), 12.0, 5.0),
    ]));
    assert!(matches!(result, Err(SignalError::InvalidDescriptor(_))));
}

#[test]
fn test_empty_network_is_degenerate() {
    assert_eq!(
        build_network(&NetworkDescriptor::default()).unwrap_err(),
        SignalError::DegenerateNetwork
    );
}

#[test]
fn test_movements_are_validated_and_kept_inert() {
    let mut desc = NetworkDescriptor::two_lane_demo();
    desc.movements = vec![
        Movement {
            origin: "v1".to_string(),
            destination: "v2".to_string(),
            probability: 0.6,
        },
        Movement {
            origin: "v1".to_string(),
            destination: "v1".to_string(),
            probability: 0.4,
        },
    ];
    let network = build_network(&desc).unwrap();
    assert_eq!(network.movement_graph().node_count(), 2);
    assert_eq!(network.movement_graph().edge_count(), 2);

    desc.movements[1].probability = 0.5;
    assert!(matches!(
        build_network(&desc),
        Err(SignalError::InvalidDescriptor(_))
    ));

    desc.movements = vec![Movement {
        origin: "v1".to_string(),
        destination: "nowhere".to_string(),
        probability: 1.0,
    }];
    assert!(matches!(
        build_network(&desc),
        Err(SignalError::InvalidDescriptor(_))
    ));
}

#[test]
fn test_displacements_are_validated() {
    let mut desc = NetworkDescriptor::two_lane_demo();
    desc.displacements = vec![Displacement {
        from: "v1".to_string(),
        to: "v2".to_string(),
        travel_time: 10.0,
    }];
    let network = build_network(&desc).unwrap();
    assert_eq!(network.travel_time(LaneId(0), LaneId(1)), Some(10.0));
    assert_eq!(network.travel_time(LaneId(1), LaneId(0)), None);

    desc.displacements[0].travel_time = -2.0;
    assert!(matches!(
        build_network(&desc),
        Err(SignalError::InvalidDescriptor(_))
    ));
}

#[test]
fn test_topology_groups_by_intersection() {
    let mut records = vec![
        LaneRecord::new("n", Some(10.0), 20.0, 20.0),
        LaneRecord::new("s", Some(10.0), 20.0, 20.0),
        LaneRecord::new("e", Some(10.0), 20.0, 20.0),
        LaneRecord::new("w", Some(10.0), 20.0, 20.0),
    ];
    records[0].intersection = Some("A".to_string());
    records[1].intersection = Some("B".to_string());
    records[2].intersection = Some("A".to_string());

    let topology = build_network(&descriptor(records)).unwrap().topology();
    assert_eq!(topology.len(), 4);
    assert_eq!(
        topology.constraint_groups(),
        vec![vec![0, 2], vec![1], vec![3]]
    );

    let single = build_network(&NetworkDescriptor::two_lane_demo())
        .unwrap()
        .topology();
    assert_eq!(single.constraint_groups(), vec![vec![0, 1]]);
}

#[test]
fn test_descriptor_json_round_trip() {
    let mut demo = NetworkDescriptor::two_lane_demo();
    demo.movements.push(Movement {
        origin: "v1".to_string(),
        destination: "v2".to_string(),
        probability: 0.25,
    });
    demo.lanes[1].intersection = Some("north".to_string());

    let text = demo.to_json().unwrap();
    assert!(text.contains("\"mean_interarrival\": 8.8"));
    assert_eq!(NetworkDescriptor::from_json(&text).unwrap(), demo);
}
