/// Single grid axis, used for column and row counts.
pub type Dim = u8;

/// Count type used for card totals and pair counts.
pub type CardCount = u16;

/// Position of a card in the grid's ordered sequence.
pub type CardId = u16;

/// Grid size as `(cols, rows)`.
pub type Size2 = (Dim, Dim);

pub const fn mult(a: Dim, b: Dim) -> CardCount {
    let a = a as CardCount;
    let b = b as CardCount;
    a.saturating_mul(b)
}

/// Number of matched entries needed to win a grid of `total` cards.
///
/// An odd grid carries one filler card, which counts as one extra entry once
/// it has been flipped.
pub const fn required_settled(total: CardCount) -> CardCount {
    let pairs = total / 2;
    if total % 2 == 0 { pairs } else { pairs + 1 }
}
