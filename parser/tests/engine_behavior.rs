//! Cross-command behavior of the scan engine: empty signals, VRF rooting,
//! determinism and fetching through an output source.

use std::fs;
use std::path::PathBuf;

use pim_show_core::CommandKind;
use pim_show_parser::{
    EmptyReason, MapSource, Outcome, ParseError, ShowParser, SourceError, StaticSource,
    parse_output,
};

fn fixture(name: &str) -> String {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name);
    fs::read_to_string(path).expect("fixture file must be readable")
}

const CASES: &[(CommandKind, Option<&str>, &str)] = &[
    (CommandKind::Ipv6Interface, None, "ipv6_interface_default.txt"),
    (CommandKind::Ipv6Interface, Some("VRF1"), "ipv6_interface_vrf1.txt"),
    (CommandKind::Interface, None, "interface_default.txt"),
    (CommandKind::Interface, Some("VRF1"), "interface_vrf1.txt"),
    (CommandKind::InterfaceDetail, None, "interface_detail_default.txt"),
    (CommandKind::InterfaceDetail, Some("VRF1"), "interface_detail_vrf1.txt"),
    (CommandKind::Ipv6BsrElection, None, "bsr_election_default.txt"),
    (CommandKind::Ipv6BsrElection, Some("VRF1"), "bsr_election_vrf1.txt"),
    (CommandKind::Ipv6BsrCandidateRp, None, "candidate_rp_default.txt"),
    (CommandKind::Ipv6BsrCandidateRp, Some("VRF1"), "candidate_rp_vrf1.txt"),
    (CommandKind::BsrRouter, Some("VRF1"), "bsr_router_vrf1_candidate_rp.txt"),
    (CommandKind::BsrRouter, None, "bsr_router_candidate_bsr.txt"),
    (CommandKind::BsrRouter, None, "bsr_router_next_bootstrap.txt"),
    (CommandKind::BsrRouter, Some("VRF1"), "bsr_router_vrf1_slot_interface.txt"),
    (CommandKind::RpMapping, None, "rp_mapping_default.txt"),
    (CommandKind::RpMapping, Some("VRF1"), "rp_mapping_vrf1_static.txt"),
];

#[test]
fn test_empty_output_is_empty_for_every_command() {
    for kind in CommandKind::ALL {
        for raw in ["", "   \n\n  \t\n"] {
            match parse_output(kind, None, raw) {
                Err(ParseError::Empty {
                    reason: EmptyReason::NoOutput,
                    ..
                }) => {}
                other => panic!("{kind}: expected empty output signal, got {other:?}"),
            }
        }
    }
}

#[test]
fn test_unrecognized_output_is_empty_for_every_command() {
    for kind in CommandKind::ALL {
        let err = parse_output(kind, None, "nothing useful here\n\n").unwrap_err();
        assert!(err.is_empty(), "{kind}: {err}");
    }
}

#[test]
fn test_vrf_banner_is_empty_for_every_command() {
    let raw = fixture("candidate_rp_missing_vrf.txt");
    for kind in CommandKind::ALL {
        let err = parse_output(kind, Some("VRF1"), &raw).unwrap_err();
        assert!(err.is_empty(), "{kind}: {err}");
    }
}

#[test]
fn test_every_fixture_is_rooted_at_its_vrf() {
    for (kind, vrf, name) in CASES {
        let record = parse_output(*kind, *vrf, &fixture(name))
            .unwrap_or_else(|e| panic!("{name}: {e}"));
        let vrfs: Vec<&str> = record.vrfs().collect();
        assert_eq!(vrfs, vec![vrf.unwrap_or("default")], "{name}");
    }
}

#[test]
fn test_parsing_is_deterministic() {
    let parser = ShowParser::new();
    for (kind, vrf, name) in CASES {
        let raw = fixture(name);
        let first = parser.parse_text(*kind, *vrf, &raw).unwrap();
        let second = parser.parse_text(*kind, *vrf, &raw).unwrap();
        assert_eq!(first, second, "{name}");
    }
}

#[test]
fn test_concurrent_parses_match_sequential_ones() {
    let parser = ShowParser::new();
    let inputs: Vec<_> = CASES
        .iter()
        .map(|(kind, vrf, name)| (*kind, *vrf, fixture(name)))
        .collect();
    let expected: Vec<_> = inputs
        .iter()
        .map(|(kind, vrf, raw)| parser.parse_text(*kind, *vrf, raw).unwrap())
        .collect();

    let actual: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|(kind, vrf, raw)| {
                let parser = &parser;
                scope.spawn(move || parser.parse_text(*kind, *vrf, raw).unwrap())
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });

    assert_eq!(actual, expected);
}

#[test]
fn test_bsr_sections_parse_independently() {
    let raw = fixture("bsr_election_default.txt");
    let (elected, candidate) = raw
        .split_once("      This system is candidate BSR")
        .unwrap();
    let bsr_path = ["vrf", "default", "address_family", "ipv6", "rp", "bsr"];

    let elected = parse_output(CommandKind::Ipv6BsrElection, None, elected).unwrap();
    let bsr = elected.get(&bsr_path).unwrap();
    assert_eq!(bsr["bsr"]["address"], "2001:1:1:1::1");
    assert!(bsr.get("bsr_candidate").is_none());

    let candidate = format!("      This system is candidate BSR{candidate}");
    let candidate = parse_output(CommandKind::Ipv6BsrElection, None, &candidate).unwrap();
    let bsr = candidate.get(&bsr_path).unwrap();
    assert_eq!(bsr["bsr_candidate"]["hash_mask_length"], 126);
    assert!(bsr.get("bsr").is_none());
}

#[test]
fn test_candidate_bsr_under_full_headers() {
    let raw = fixture("bsr_election_default.txt");
    let elected_view = [
        "This system is the Bootstrap Router",
        "BSR Address:",
        "Uptime:",
        "RPF:",
        "BS Timer:",
    ];
    let candidate_only: String = raw
        .lines()
        .filter(|line| !elected_view.iter().any(|field| line.trim().starts_with(field)))
        .map(|line| format!("{line}\n"))
        .collect();
    assert!(candidate_only.contains("Scope Range List: ff00::/8"));

    let record = parse_output(CommandKind::Ipv6BsrElection, None, &candidate_only).unwrap();
    let bsr = record
        .get(&["vrf", "default", "address_family", "ipv6", "rp", "bsr"])
        .unwrap();
    assert!(bsr.get("bsr").is_none());
    assert_eq!(bsr["bsr_candidate"]["address"], "2001:1:1:1::1");
}

#[test]
fn test_same_rp_learned_twice_yields_distinct_entries() {
    let record = parse_output(CommandKind::RpMapping, None, &fixture("rp_mapping_default.txt")).unwrap();
    let rp = record
        .get(&["vrf", "default", "address_family", "ipv4", "rp"])
        .unwrap();

    let mappings = rp["rp_mappings"].as_object().unwrap();
    let three: Vec<&String> = mappings
        .keys()
        .filter(|key| key.contains(" 3.3.3.3 "))
        .collect();
    assert_eq!(three.len(), 2);
    assert_eq!(mappings.len(), 4);
    assert_eq!(rp["rp_list"].as_object().unwrap().len(), 4);
}

#[test]
fn test_parse_issues_the_literal_command() {
    let source = MapSource::new()
        .with(
            "show ip pim vrf VRF1 interface",
            fixture("interface_vrf1.txt"),
        )
        .with(
            "show ipv6 pim bsr candidate-rp",
            fixture("candidate_rp_default.txt"),
        );
    let parser = ShowParser::new();

    let record = parser
        .parse(CommandKind::Interface, &source, Some("VRF1"))
        .unwrap();
    assert!(
        record
            .get(&["vrf", "VRF1", "interfaces", "GigabitEthernet3"])
            .is_some()
    );

    let record = parser
        .parse(CommandKind::Ipv6BsrCandidateRp, &source, None)
        .unwrap();
    assert_eq!(record.vrfs().collect::<Vec<_>>(), vec!["default"]);

    let err = parser
        .parse(CommandKind::Interface, &source, None)
        .unwrap_err();
    assert!(matches!(
        err,
        ParseError::Source {
            source: SourceError::UnknownCommand(ref command),
            ..
        } if command == "show ip pim interface"
    ));
}

#[test]
fn test_report_counts_prompt_and_headers_as_skipped() {
    let source = StaticSource::new(fixture("bsr_router_candidate_bsr.txt"));
    let run = ShowParser::new().parse_with_report(CommandKind::BsrRouter, &source, None);

    assert!(run.result.is_ok());
    let report = run.report;
    assert_eq!(report.outcome, Outcome::Parsed);
    assert_eq!(report.command, "show ip pim bsr-router");
    assert_eq!(report.total_lines, 7);
    assert_eq!(report.relevant_lines, 7);
    assert_eq!(report.recognized_lines, 5);
    assert_eq!(
        report.skipped_lines,
        vec![
            "R1_xe#show ip pim bsr-router".to_string(),
            "PIMv2 Bootstrap information".to_string(),
        ]
    );
}

#[test]
fn test_report_for_banner_output() {
    let run = ShowParser::new().parse_text_with_report(
        CommandKind::RpMapping,
        Some("VRF1"),
        &fixture("rp_mapping_banner.txt"),
    );
    assert!(run.result.is_err());
    assert_eq!(run.report.outcome, Outcome::Empty);
    assert_eq!(run.report.vrf, "VRF1");
    assert!(run.report.failure_detail.unwrap().contains("% DDDDD"));
}
