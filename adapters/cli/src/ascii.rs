//! Plain-text rendering of a world, one character per cell.

use tidepool_core::{CoinKind, ReceptacleKind, TileKind};
use tidepool_world::{query, World};

/// Renders every row of the grid followed by a newline.
///
/// Collected items render as floor. Enemies are drawn over tiles and the
/// player over everything.
pub(crate) fn render(world: &World) -> String {
    let (columns, rows) = query::dimensions(world);
    let mut canvas = vec![vec![' '; columns as usize]; rows as usize];

    for tile in query::tiles(world) {
        let collected = tile
            .item()
            .and_then(|item| query::item(world, item))
            .is_some_and(|item| item.collected);
        let glyph = if collected { ' ' } else { glyph(tile.kind()) };
        put(&mut canvas, tile.cell().column(), tile.cell().row(), glyph);
    }
    for enemy in query::enemies(world) {
        put(&mut canvas, enemy.cell.column(), enemy.cell.row(), 'E');
    }
    let player = query::player(world).cell;
    put(&mut canvas, player.column(), player.row(), '@');

    let mut out = String::with_capacity((columns as usize + 1) * rows as usize);
    for row in canvas {
        out.extend(row);
        out.push('\n');
    }
    out
}

fn put(canvas: &mut [Vec<char>], column: u32, row: u32, glyph: char) {
    if let Some(slot) = canvas
        .get_mut(row as usize)
        .and_then(|line| line.get_mut(column as usize))
    {
        *slot = glyph;
    }
}

fn glyph(kind: TileKind) -> char {
    match kind {
        TileKind::Background => ' ',
        TileKind::Wall => '#',
        TileKind::Food(_) => 'f',
        TileKind::Coin(CoinKind::Silver) => 's',
        TileKind::Coin(CoinKind::Gold) => 'g',
        TileKind::Shell(_) => 'o',
        TileKind::TreasureMap => 'm',
        TileKind::MapMarker => 'x',
        TileKind::RareBonus => '*',
        TileKind::PuzzleReceptacle(ReceptacleKind::Empty) => 'B',
        TileKind::PuzzleReceptacle(ReceptacleKind::Reference(_)) => 'R',
        TileKind::Timer => 'T',
    }
}
