use crate::{board::Position, error::FenError, movegen::legal_moves, types::*};

pub fn move_to_uci(mv: Move) -> String {
    let mut s = String::with_capacity(5);
    s.push_str(&sq_to_coord(mv.from));
    s.push_str(&sq_to_coord(mv.to));
    if let Some(p) = mv.promo {
        s.push(p.letter());
    }
    s
}

/// Parses long algebraic notation ("e2e4", "e7e8q") without consulting a
/// position, so castle and en-passant flags are left unset.
pub fn parse_uci_squares(txt: &str) -> Option<Move> {
    if !(4..=5).contains(&txt.len()) || !txt.is_ascii() {
        return None;
    }
    let from = coord_to_sq(&txt[0..2])?;
    let to = coord_to_sq(&txt[2..4])?;
    match txt[4..].chars().next() {
        None => Some(Move::new(from, to)),
        Some(ch) => {
            let promo = PieceKind::from_letter(ch)?;
            PieceKind::PROMOTIONS
                .contains(&promo)
                .then(|| Move::with_promo(from, to, promo))
        }
    }
}

/// Parses a move and matches it against the legal moves of `pos`, so the
/// returned move carries correct castle / en-passant flags.
pub fn parse_uci_move(pos: &Position, txt: &str) -> Option<Move> {
    let wanted = parse_uci_squares(txt)?;
    legal_moves(pos).into_iter().find(|m| m.same_squares(&wanted))
}

/// Applies the arguments of a UCI `position` command:
/// `startpos [moves ...]` or `fen <fields> [moves ...]`.
///
/// Unparseable or illegal moves stop the move list; the position reached so
/// far is kept.
pub fn set_position_from_uci(pos: &mut Position, args: &[&str]) -> Result<(), FenError> {
    let moves_at = args.iter().position(|&a| a == "moves").unwrap_or(args.len());
    *pos = match args.first() {
        Some(&"fen") => Position::from_fen(&args[1..moves_at].join(" "))?,
        _ => Position::startpos(),
    };

    for txt in args.iter().skip(moves_at + 1) {
        match parse_uci_move(pos, txt) {
            Some(mv) => {
                pos.make_move(mv);
            }
            None => break,
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "uci_tests.rs"]
mod uci_tests;
