#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

use qv_nullables::{NullClock, NullStore};
use qv_types::{Principal, ProposalId};
use qv_voting::{QuadraticVoting, VotingParams};

#[derive(Arbitrary, Debug)]
enum Op {
    Create,
    Vote { voter: u8, proposal: u8, stake: u128 },
    Withdraw { voter: u8, proposal: u8 },
    FailNextCommit,
}

#[derive(Arbitrary, Debug)]
struct Input {
    capacity: u8,
    ops: Vec<Op>,
}

fn voter(n: u8) -> Principal {
    Principal::parse(format!("voter_{}", n % 8)).unwrap()
}

// Drive arbitrary call sequences through the engine, including injected
// storage failures, and require every derived value to stay consistent.
fuzz_target!(|input: Input| {
    let params = VotingParams {
        top_capacity: usize::from(input.capacity % 16),
        ..VotingParams::default()
    };
    let mut qv = QuadraticVoting::open(NullStore::new(), NullClock::default(), params).unwrap();
    let creator = voter(0);

    for op in input.ops.iter().take(512) {
        match op {
            Op::Create => {
                let _ = qv.create_proposal(&creator, "Proposal", "Description");
            }
            Op::Vote { voter: v, proposal, stake } => {
                let id = ProposalId::new(u64::from(*proposal % 32));
                let _ = qv.vote(&voter(*v), id, *stake);
            }
            Op::Withdraw { voter: v, proposal } => {
                let id = ProposalId::new(u64::from(*proposal % 32));
                let _ = qv.withdraw_vote(&voter(*v), id);
            }
            Op::FailNextCommit => qv.store().fail_next_commit(),
        }
        qv.clock().advance(1);
    }

    let report = qv.audit().unwrap();
    assert!(report.is_clean(), "audit problems: {:?}", report.problems);
});
