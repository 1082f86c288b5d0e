//! Single-block decode — local self-loop and split resolution.

use dbt_frontend::decode_basic_block;
use dbt_isa::ExecMode;

use crate::helpers::*;

#[test]
fn branch_to_own_start_becomes_self_loop() {
    // B 0x1000 at 0x1000: one block [0x1000, 0x1004), branch to
    // itself, no fallthrough.
    let mem = words(0x1000, &[a64_b(0x1000, 0x1000)]);
    let graph = decode_basic_block(&mem, 0x1000, ExecMode::A64);

    assert_eq!(graph.len(), 1);
    let entry = graph.entry();
    let block = graph.get(entry);
    assert_eq!(block.position, 0x1000);
    assert_eq!(block.end_position, 0x1004);
    assert_eq!(block.branch, Some(entry));
    assert_eq!(block.next, None);
}

#[test]
fn interior_target_splits_the_block() {
    let mem = words(
        0x1000,
        &[
            a64_nop(),
            a64_nop(),
            a64_movz(0, 1),
            a64_b(0x100C, 0x1008),
        ],
    );
    let graph = decode_basic_block(&mem, 0x1000, ExecMode::A64);
    assert_eq!(graph.len(), 2);

    let entry = graph.entry();
    let head = graph.get(entry);
    let tail_id = head.next.expect("head links to the split tail");
    let tail = graph.get(tail_id);

    // Ranges are exactly contiguous.
    assert_eq!(head.position, 0x1000);
    assert_eq!(head.end_position, 0x1008);
    assert_eq!(tail.position, 0x1008);
    assert_eq!(tail.end_position, 0x1010);
    assert_eq!(head.branch, None);

    // The tail is the loop head.
    assert_eq!(tail.branch, Some(tail_id));

    // Opcode sequences concatenate to the original stream with no
    // duplication or loss.
    let addrs: Vec<u64> = head
        .opcodes
        .iter()
        .chain(tail.opcodes.iter())
        .map(|op| op.address)
        .collect();
    assert_eq!(addrs, vec![0x1000, 0x1004, 0x1008, 0x100C]);
    assert_eq!(head.opcodes.len(), 2);
    assert_eq!(tail.opcodes.len(), 2);
}

#[test]
fn target_at_end_position_is_not_resolved_locally() {
    // Branch to the very next instruction: deliberately left to the
    // subroutine builder.
    let mem = words(0x1000, &[a64_nop(), a64_b(0x1004, 0x1008)]);
    let graph = decode_basic_block(&mem, 0x1000, ExecMode::A64);

    assert_eq!(graph.len(), 1);
    let block = graph.get(graph.entry());
    assert_eq!(block.end_position, 0x1008);
    assert_eq!(block.branch, None);
    assert_eq!(block.next, None);
}

#[test]
fn target_before_start_is_not_resolved_locally() {
    let mem = words(0x1000, &[a64_nop(), a64_b(0x1004, 0x0F00)]);
    let graph = decode_basic_block(&mem, 0x1000, ExecMode::A64);

    assert_eq!(graph.len(), 1);
    assert_eq!(graph.get(graph.entry()).branch, None);
}

#[test]
fn mid_instruction_target_leaves_the_block_intact() {
    // A wide-prefix halfword decodes as the 4-byte sentinel; a later
    // branch into its second halfword lands between opcodes and must
    // not split.
    let mem = halfwords(0x100, &[0xF000, 0x0000, t16_b(0x104, 0x102)]);
    let graph = decode_basic_block(&mem, 0x100, ExecMode::T16);

    assert_eq!(graph.len(), 1);
    let block = graph.get(graph.entry());
    assert_eq!(block.position, 0x100);
    assert_eq!(block.end_position, 0x106);
    assert_eq!(block.branch, None);
    assert_eq!(block.opcodes.len(), 2);
}

#[test]
fn conditional_terminator_still_splits() {
    let mem = words(
        0x1000,
        &[a64_nop(), a64_movz(0, 1), a64_b_cond(0x1008, 0x1004, COND_NE)],
    );
    let graph = decode_basic_block(&mem, 0x1000, ExecMode::A64);
    assert_eq!(graph.len(), 2);

    let head = graph.get(graph.entry());
    assert_eq!(head.end_position, 0x1004);
    let tail_id = head.next.unwrap();
    let tail = graph.get(tail_id);
    assert_eq!(tail.position, 0x1004);
    assert_eq!(tail.end_position, 0x100C);
    assert_eq!(tail.branch, Some(tail_id));
}
