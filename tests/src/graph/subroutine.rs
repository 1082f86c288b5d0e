//! Subroutine CFG construction — worklist discovery, edge wiring
//! and overlap resolution.

use dbt_core::BlockGraph;
use dbt_frontend::decode_subroutine;
use dbt_isa::{ExecMode, InstEmit};

use crate::helpers::*;

/// Post-construction invariants: unique start addresses, no
/// overlapping ranges, every block filled.
fn assert_graph_invariants(graph: &BlockGraph) {
    for (ia, a) in graph.iter() {
        assert!(!a.opcodes.is_empty());
        assert!(a.end_position > a.position);
        for (ib, b) in graph.iter() {
            if ia == ib {
                continue;
            }
            assert_ne!(a.position, b.position, "duplicate block start");
            assert!(
                !a.overlaps(b),
                "blocks [{:#x},{:#x}) and [{:#x},{:#x}) overlap",
                a.position,
                a.end_position,
                b.position,
                b.end_position
            );
        }
    }
}

#[test]
fn branch_to_self() {
    // B 0x1000 at 0x1000: single block, branch == self, no next.
    let mem = words(0x1000, &[a64_b(0x1000, 0x1000)]);
    let graph = decode_subroutine(&mem, 0x1000, ExecMode::A64);

    assert_eq!(graph.len(), 1);
    let entry = graph.entry();
    let block = graph.get(entry);
    assert_eq!(block.position, 0x1000);
    assert_eq!(block.end_position, 0x1004);
    assert_eq!(block.branch, Some(entry));
    assert_eq!(block.next, None);
    assert_graph_invariants(&graph);
}

#[test]
fn conditional_branch_gets_both_edges() {
    let mem = words(
        0x1000,
        &[
            a64_cbz(0, 0x1000, 0x100C), // entry
            a64_nop(),                  // fallthrough block
            a64_ret(),
            a64_ret(), // taken block
        ],
    );
    let graph = decode_subroutine(&mem, 0x1000, ExecMode::A64);
    assert_eq!(graph.len(), 3);

    let entry = graph.get(graph.entry());
    let taken = graph.get(entry.branch.expect("taken edge"));
    let fall = graph.get(entry.next.expect("fallthrough edge"));
    assert_eq!(taken.position, 0x100C);
    assert_eq!(fall.position, 0x1004);
    assert_graph_invariants(&graph);
}

#[test]
fn unconditional_branch_has_no_fallthrough() {
    let mem = words(0x1000, &[a64_b(0x1000, 0x1010), a64_nop(), a64_nop(), a64_nop(), a64_ret()]);
    let graph = decode_subroutine(&mem, 0x1000, ExecMode::A64);

    assert_eq!(graph.len(), 2);
    let entry = graph.get(graph.entry());
    assert_eq!(entry.next, None);
    let target = graph.get(entry.branch.unwrap());
    assert_eq!(target.position, 0x1010);
    assert_graph_invariants(&graph);
}

#[test]
fn register_branch_has_no_edges() {
    // An indirect branch is unconditional: decoding must not run
    // past it into whatever follows.
    let mem = words(0x1000, &[a64_nop(), a64_br(3), a64_brk(0)]);
    let graph = decode_subroutine(&mem, 0x1000, ExecMode::A64);

    assert_eq!(graph.len(), 1);
    let block = graph.get(graph.entry());
    assert_eq!(block.end_position, 0x1008);
    assert_eq!(block.branch, None);
    assert_eq!(block.next, None);
}

#[test]
fn call_gets_fallthrough_but_no_taken_edge() {
    // Control returns after the callee, so a call keeps its
    // fallthrough; its target belongs to another subroutine.
    let mem = words(0x1000, &[a64_bl(0x1000, 0x2000), a64_ret()]);
    let graph = decode_subroutine(&mem, 0x1000, ExecMode::A64);

    assert_eq!(graph.len(), 2);
    let entry = graph.get(graph.entry());
    assert_eq!(entry.branch, None);
    let fall = graph.get(entry.next.expect("call fallthrough"));
    assert_eq!(fall.position, 0x1004);
    assert_eq!(fall.last_op().emit, InstEmit::Ret);
    assert!(graph.iter().all(|(_, b)| b.position != 0x2000));
    assert_graph_invariants(&graph);
}

#[test]
fn register_call_gets_fallthrough() {
    let mem = words(0x1000, &[a64_blr(8), a64_ret()]);
    let graph = decode_subroutine(&mem, 0x1000, ExecMode::A64);

    let entry = graph.get(graph.entry());
    assert_eq!(entry.branch, None);
    assert!(entry.next.is_some());
}

#[test]
fn exception_terminator_keeps_fallthrough() {
    // A system call returns to the following instruction, so the
    // block it ends still falls through.
    let mem = words(0x1000, &[a64_nop(), a64_svc(0), a64_ret()]);
    let graph = decode_subroutine(&mem, 0x1000, ExecMode::A64);

    assert_eq!(graph.len(), 2);
    let entry = graph.get(graph.entry());
    assert_eq!(entry.end_position, 0x1008);
    assert_eq!(entry.branch, None);
    let fall = graph.get(entry.next.expect("post-trap fallthrough"));
    assert_eq!(fall.position, 0x1008);
    assert_eq!(fall.last_op().emit, InstEmit::Ret);
}

#[test]
fn overlapping_discovery_shrinks_the_bigger_block() {
    // The entry decodes [0x1000, 0x1010) before its own interior
    // branch target 0x1008 is discovered as a block of its own; the
    // colliding end forces the entry block to shrink.
    let mem = words(
        0x1000,
        &[
            a64_nop(),
            a64_nop(),
            a64_nop(),
            a64_b_cond(0x100C, 0x1008, COND_NE),
            a64_nop(),
            a64_b(0x1014, 0x1010),
        ],
    );
    let graph = decode_subroutine(&mem, 0x1000, ExecMode::A64);
    assert_eq!(graph.len(), 3);
    assert_graph_invariants(&graph);

    let entry = graph.get(graph.entry());
    assert_eq!(entry.position, 0x1000);
    assert_eq!(entry.end_position, 0x1008);
    assert_eq!(entry.opcodes.len(), 2);
    // Truncation cleared the stale taken edge.
    assert_eq!(entry.branch, None);

    let mid_id = entry.next.expect("shrunken block falls through");
    let mid = graph.get(mid_id);
    assert_eq!(mid.position, 0x1008);
    assert_eq!(mid.end_position, 0x1010);
    assert_eq!(mid.opcodes.len(), 2);
    // The nested block kept the terminator and loops to itself.
    assert_eq!(mid.branch, Some(mid_id));

    let tail_id = mid.next.expect("conditional falls through");
    let tail = graph.get(tail_id);
    assert_eq!(tail.position, 0x1010);
    assert_eq!(tail.end_position, 0x1018);
    assert_eq!(tail.branch, Some(tail_id));
    assert_eq!(tail.next, None);
}

#[test]
fn overlap_resolution_cascades() {
    // Three discovery paths decode tails sharing end addresses; one
    // collision's shrink triggers the next.
    let mem = words(
        0x1000,
        &[
            a64_b_cond(0x1000, 0x100C, COND_NE),
            a64_nop(),
            a64_nop(),
            a64_nop(),
            a64_b_cond(0x1010, 0x1008, COND_NE),
            a64_ret(),
        ],
    );
    let graph = decode_subroutine(&mem, 0x1000, ExecMode::A64);
    assert_eq!(graph.len(), 5);
    assert_graph_invariants(&graph);

    let find = |pos: u64| {
        graph
            .iter()
            .find(|(_, b)| b.position == pos)
            .unwrap_or_else(|| panic!("no block at {pos:#x}"))
    };

    let (_, b1000) = find(0x1000);
    let (id1004, b1004) = find(0x1004);
    let (id1008, b1008) = find(0x1008);
    let (id100c, b100c) = find(0x100C);
    let (id1014, b1014) = find(0x1014);

    assert_eq!(b1000.end_position, 0x1004);
    assert_eq!(b1000.branch, Some(id100c));
    assert_eq!(b1000.next, Some(id1004));

    // Chain of truncated straight-line blocks.
    assert_eq!(b1004.end_position, 0x1008);
    assert_eq!(b1004.branch, None);
    assert_eq!(b1004.next, Some(id1008));

    assert_eq!(b1008.end_position, 0x100C);
    assert_eq!(b1008.branch, None);
    assert_eq!(b1008.next, Some(id100c));

    // The block owning the conditional terminator keeps both edges.
    assert_eq!(b100c.end_position, 0x1014);
    assert_eq!(b100c.branch, Some(id1008));
    assert_eq!(b100c.next, Some(id1014));

    assert_eq!(b1014.end_position, 0x1018);
    assert_eq!(b1014.next, None);
}

#[test]
fn legacy_subroutine_with_pc_write_terminator() {
    // mov pc, lr with cond AL: unconditional, no fallthrough.
    let mem = words(
        0x8000,
        &[a32_mov(COND_AL, 0, 1), a32_mov(COND_AL, 15, 14)],
    );
    let graph = decode_subroutine(&mem, 0x8000, ExecMode::A32);

    assert_eq!(graph.len(), 1);
    let block = graph.get(graph.entry());
    assert_eq!(block.end_position, 0x8008);
    assert_eq!(block.branch, None);
    assert_eq!(block.next, None);
}

#[test]
fn legacy_conditional_pc_write_falls_through() {
    let mem = words(
        0x8000,
        &[a32_mov(COND_NE, 15, 14), a32_bx(COND_AL, 14)],
    );
    let graph = decode_subroutine(&mem, 0x8000, ExecMode::A32);

    assert_eq!(graph.len(), 2);
    let entry = graph.get(graph.entry());
    assert_eq!(entry.branch, None);
    let fall = graph.get(entry.next.expect("conditional pc write"));
    assert_eq!(fall.position, 0x8004);
    assert_eq!(fall.next, None);
}

#[test]
fn compact_mode_subroutine() {
    let mem = halfwords(
        0x100,
        &[
            t16_mov_imm(0, 1),
            t16_b_cond(COND_EQ, 0x102, 0x100),
            t16_bx(14),
        ],
    );
    let graph = decode_subroutine(&mem, 0x100, ExecMode::T16);

    assert_eq!(graph.len(), 2);
    let entry_id = graph.entry();
    let entry = graph.get(entry_id);
    assert_eq!(entry.position, 0x100);
    assert_eq!(entry.end_position, 0x104);
    // Conditional back-branch to the entry itself.
    assert_eq!(entry.branch, Some(entry_id));
    let fall = graph.get(entry.next.expect("conditional fallthrough"));
    assert_eq!(fall.position, 0x104);
    assert_eq!(fall.end_position, 0x106);
    assert_eq!(fall.last_op().emit, InstEmit::Bx);
    assert_graph_invariants(&graph);
}

#[test]
fn diamond_merges_at_join_block() {
    let mem = words(
        0x1000,
        &[
            a64_cbnz(0, 0x1000, 0x100C), // entry
            a64_nop(),                   // left
            a64_b(0x1008, 0x1010),       //   joins
            a64_b(0x100C, 0x1010),       // right, joins
            a64_ret(),                   // join
        ],
    );
    let graph = decode_subroutine(&mem, 0x1000, ExecMode::A64);
    assert_eq!(graph.len(), 4);
    assert_graph_invariants(&graph);

    let entry = graph.get(graph.entry());
    let left = graph.get(entry.next.unwrap());
    let right = graph.get(entry.branch.unwrap());
    // Both arms branch to the same join block index.
    assert_eq!(left.branch, right.branch);
    let join = graph.get(left.branch.unwrap());
    assert_eq!(join.position, 0x1010);
    assert_eq!(join.last_op().emit, InstEmit::Ret);
}
