//! Basic-block filling and control-flow-graph construction.
//!
//! Block boundaries in machine code are discovered, not declared:
//! two discovery paths can decode overlapping byte ranges. The
//! subroutine builder detects such overlaps through a visited-by-end
//! map (two contiguous decodes sharing an end address necessarily
//! overlap, one nested at the other's tail) and resolves them by
//! shrinking the earlier-starting block, cascading until no
//! collision remains.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;
use tracing::debug;

use dbt_core::{Block, BlockGraph, BlockId, GuestMemory};
use dbt_isa::ExecMode;

use crate::classify::{is_branch, is_call, is_exception, is_unconditional_branch};
use crate::decode::decode_op;

/// Decode instructions from `block.position` until a branch or
/// exception-raising terminator, inclusive. Sets `end_position`.
///
/// Always terminates on real guest code: every opcode has positive
/// size and every real subroutine ends in a transfer or trap. A
/// straight-line region with neither would fill unboundedly; that is
/// an accepted property of the input contract, not guarded here.
pub fn fill_block<M: GuestMemory>(mem: &M, mode: ExecMode, block: &mut Block) {
    let mut addr = block.position;
    loop {
        let op = decode_op(mem, addr, mode);
        addr += op.size as u64;
        let terminator = is_branch(&op) || is_exception(&op);
        block.opcodes.push(op);
        if terminator {
            break;
        }
    }
    block.end_position = addr;
}

/// Decode exactly one block, resolving only the two local patterns
/// that need no subroutine traversal: a terminator targeting the
/// block's own start becomes a self-loop, and a strictly interior
/// target splits the block in two.
///
/// A target at `end_position` or before `position` is left to full
/// subroutine construction, as is an interior target that does not
/// land on a decoded instruction boundary.
pub fn decode_basic_block<M: GuestMemory>(mem: &M, start: u64, mode: ExecMode) -> BlockGraph {
    let mut graph = BlockGraph::new();
    let root = graph.alloc(start);
    fill_block(mem, mode, graph.get_mut(root));

    let target = graph.get(root).last_op().imm_branch_target();
    if let Some(target) = target {
        if target == start {
            graph.get_mut(root).branch = Some(root);
        } else if graph.get(root).contains(target) && target > start {
            split_block(&mut graph, root, target);
        }
    }
    graph
}

/// Split `block` at `target`, a strictly interior address: the tail
/// opcodes move into a new block which becomes both a loop head
/// (`branch` to itself) and the original's fallthrough.
fn split_block(graph: &mut BlockGraph, block: BlockId, target: u64) {
    let split_at = graph
        .get(block)
        .opcodes
        .iter()
        .position(|op| op.address == target);
    let Some(split_at) = split_at else {
        // Target falls mid-instruction; nothing local to do.
        return;
    };

    let tail = graph.get_mut(block).opcodes.split_off(split_at);
    let end = graph.get(block).end_position;
    let new = graph.alloc(target);

    let new_block = graph.get_mut(new);
    new_block.opcodes = tail;
    new_block.end_position = end;
    new_block.branch = Some(new);

    let old = graph.get_mut(block);
    old.end_position = target;
    old.next = Some(new);

    debug!("split block @ {:#x}: [{:#x}, {:#x})", target, target, end);
}

/// Discover all blocks reachable from `start` and wire their
/// `branch`/`next` edges, resolving block overlaps as they surface.
///
/// Breadth-first worklist keyed by start address: each address is
/// enqueued and filled at most once. The entry block is the graph's
/// index 0.
pub fn decode_subroutine<M: GuestMemory>(mem: &M, start: u64, mode: ExecMode) -> BlockGraph {
    let mut graph = BlockGraph::new();
    let mut visited: FxHashMap<u64, BlockId> = FxHashMap::default();
    let mut visited_end: FxHashMap<u64, BlockId> = FxHashMap::default();
    let mut work: VecDeque<BlockId> = VecDeque::new();

    enqueue(&mut graph, &mut visited, &mut work, start);

    while let Some(mut current) = work.pop_front() {
        fill_block(mem, mode, graph.get_mut(current));
        debug!(
            "block [{:#x}, {:#x}), {} ops",
            graph.get(current).position,
            graph.get(current).end_position,
            graph.get(current).opcodes.len()
        );

        let term = graph.get(current).last_op();
        let imm_target = term.imm_branch_target();
        let call = is_call(term);
        let uncond = is_unconditional_branch(term);
        let end = graph.get(current).end_position;

        // Taken edge: immediate-target branches that are not calls.
        // A call's target starts a different subroutine.
        if let Some(target) = imm_target {
            if !call {
                let taken = enqueue(&mut graph, &mut visited, &mut work, target);
                graph.get_mut(current).branch = Some(taken);
            }
        }
        // Fallthrough edge: anything not provably always-taken, and
        // calls, because control returns after the callee.
        if !uncond || call {
            let fall = enqueue(&mut graph, &mut visited, &mut work, end);
            graph.get_mut(current).next = Some(fall);
        }

        // Overlap resolution. Two blocks sharing an end address are
        // contiguous decodes of the same tail: the later-starting one
        // is nested wholly inside the earlier-starting one. Shrink
        // the earlier ("bigger") block to end where the nested one
        // begins, dropping its duplicated tail opcodes, and keep
        // checking — the shrunken end can collide again.
        loop {
            let cur_end = graph.get(current).end_position;
            let Some(&other) = visited_end.get(&cur_end) else {
                break;
            };
            let (big, small) = if graph.get(current).position < graph.get(other).position {
                (current, other)
            } else {
                (other, current)
            };
            let small_pos = graph.get(small).position;
            let small_end = graph.get(small).end_position;
            let small_len = graph.get(small).opcodes.len();

            let b = graph.get_mut(big);
            assert!(
                small_len <= b.opcodes.len(),
                "nested block [{:#x}, {:#x}) larger than its container",
                small_pos,
                small_end
            );
            b.opcodes.truncate(b.opcodes.len() - small_len);
            b.end_position = small_pos;
            // The old terminator now belongs to the nested block;
            // the truncated block only falls through into it.
            b.branch = None;
            b.next = Some(small);

            visited_end.insert(small_end, small);
            debug!(
                "overlap: shrunk [{:#x}, ..) to end {:#x}",
                graph.get(big).position,
                small_pos
            );
            current = big;
        }
        visited_end.insert(graph.get(current).end_position, current);
    }
    graph
}

/// Fetch-or-create the block starting at `position`, scheduling it
/// for filling when newly created.
fn enqueue(
    graph: &mut BlockGraph,
    visited: &mut FxHashMap<u64, BlockId>,
    work: &mut VecDeque<BlockId>,
    position: u64,
) -> BlockId {
    if let Some(&id) = visited.get(&position) {
        return id;
    }
    let id = graph.alloc(position);
    visited.insert(position, id);
    work.push_back(id);
    id
}
