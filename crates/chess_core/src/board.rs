use crate::{
    bitboard::Bitboard,
    error::{FenError, RulesError},
    movegen::legal_moves,
    types::*,
    uci::move_to_uci,
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CastlingRights {
    pub wk: bool,
    pub wq: bool,
    pub bk: bool,
    pub bq: bool,
}

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights {
        wk: false,
        wq: false,
        bk: false,
        bq: false,
    };

    pub fn kingside(&self, c: Color) -> bool {
        match c {
            Color::White => self.wk,
            Color::Black => self.bk,
        }
    }

    pub fn queenside(&self, c: Color) -> bool {
        match c {
            Color::White => self.wq,
            Color::Black => self.bq,
        }
    }

    /// True if `c` may still castle on either side.
    pub fn any(&self, c: Color) -> bool {
        self.kingside(c) || self.queenside(c)
    }

    /// Drops whichever right is tied to a rook or king standing on `square`.
    fn touch(&mut self, square: u8) {
        match square {
            0 => self.wq = false,
            7 => self.wk = false,
            4 => {
                self.wk = false;
                self.wq = false;
            }
            56 => self.bq = false,
            63 => self.bk = false,
            60 => {
                self.bk = false;
                self.bq = false;
            }
            _ => {}
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Position {
    pub board: [Option<Piece>; 64],
    pub side_to_move: Color,
    pub castling: CastlingRights,
    pub en_passant: Option<u8>, // square behind a pawn that just advanced 2
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

#[derive(Clone, Debug)]
pub struct Undo {
    pub captured: Option<Piece>,
    pub castling: CastlingRights,
    pub en_passant: Option<u8>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
    pub moved_piece: Piece,
    pub rook_move: Option<(u8, u8)>, // (rook_from, rook_to) for castling
    pub ep_captured_sq: Option<u8>,  // square actually captured in en-passant
}

/// Result of playing a legal move on a copy of a position.
#[derive(Clone, Debug)]
pub struct Applied {
    pub position: Position,
    pub is_check: bool,
    pub is_checkmate: bool,
    pub is_stalemate: bool,
}

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

impl Position {
    pub fn startpos() -> Self {
        let mut p = Position {
            board: [None; 64],
            side_to_move: Color::White,
            castling: CastlingRights {
                wk: true,
                wq: true,
                bk: true,
                bq: true,
            },
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        };
        for (f, &kind) in BACK_RANK.iter().enumerate() {
            p.board[f] = Some(Piece::new(Color::White, kind));
            p.board[8 + f] = Some(Piece::new(Color::White, PieceKind::Pawn));
            p.board[48 + f] = Some(Piece::new(Color::Black, PieceKind::Pawn));
            p.board[56 + f] = Some(Piece::new(Color::Black, kind));
        }
        p
    }

    /// Parses Forsyth-Edwards Notation. The move counters are optional.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() < 4 {
            return Err(FenError::MissingFields(parts.len()));
        }

        let ranks: Vec<&str> = parts[0].split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::RankCount(ranks.len()));
        }

        let mut board = [None; 64];
        for (rank_idx, rank_str) in ranks.iter().enumerate() {
            let rank: i8 = 7 - rank_idx as i8; // FEN lists rank 8 .. 1
            let mut file: i8 = 0;
            for ch in rank_str.chars() {
                if let Some(d) = ch.to_digit(10) {
                    file += d as i8;
                } else {
                    let kind = PieceKind::from_letter(ch).ok_or(FenError::PieceChar(ch))?;
                    let color = if ch.is_uppercase() {
                        Color::White
                    } else {
                        Color::Black
                    };
                    let s = sq(file, rank).ok_or(FenError::FileCount { rank: rank_idx })?;
                    board[s as usize] = Some(Piece::new(color, kind));
                    file += 1;
                }
                if file > 8 {
                    return Err(FenError::FileCount { rank: rank_idx });
                }
            }
            if file != 8 {
                return Err(FenError::FileCount { rank: rank_idx });
            }
        }

        let side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::SideToMove(other.to_string())),
        };

        let mut castling = CastlingRights::NONE;
        if parts[2] != "-" {
            for c in parts[2].chars() {
                match c {
                    'K' => castling.wk = true,
                    'Q' => castling.wq = true,
                    'k' => castling.bk = true,
                    'q' => castling.bq = true,
                    _ => return Err(FenError::CastlingChar(c)),
                }
            }
        }

        let en_passant = match parts[3] {
            "-" => None,
            coord => Some(coord_to_sq(coord).ok_or_else(|| FenError::EnPassant(coord.to_string()))?),
        };

        let counter = |idx: usize, default: u32| -> Result<u32, FenError> {
            match parts.get(idx) {
                Some(txt) => txt.parse().map_err(|_| FenError::Counter(txt.to_string())),
                None => Ok(default),
            }
        };

        Ok(Position {
            board,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock: counter(4, 0)?,
            fullmove_number: counter(5, 1)?,
        })
    }

    /// Canonical FEN serialization.
    pub fn to_fen(&self) -> String {
        let mut out = String::with_capacity(90);
        for rank in (0..8i8).rev() {
            let mut empty = 0;
            for file in 0..8i8 {
                match sq(file, rank).and_then(|s| self.piece_at(s)) {
                    Some(pc) => {
                        if empty > 0 {
                            out.push_str(&empty.to_string());
                            empty = 0;
                        }
                        out.push(pc.fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push_str(&empty.to_string());
            }
            if rank > 0 {
                out.push('/');
            }
        }

        out.push(' ');
        out.push(match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });

        out.push(' ');
        let rights = [
            (self.castling.wk, 'K'),
            (self.castling.wq, 'Q'),
            (self.castling.bk, 'k'),
            (self.castling.bq, 'q'),
        ];
        let before = out.len();
        for (held, ch) in rights {
            if held {
                out.push(ch);
            }
        }
        if out.len() == before {
            out.push('-');
        }

        out.push(' ');
        match self.en_passant {
            Some(ep) => out.push_str(&sq_to_coord(ep)),
            None => out.push('-'),
        }
        out.push_str(&format!(" {} {}", self.halfmove_clock, self.fullmove_number));
        out
    }

    pub fn king_sq(&self, c: Color) -> Option<u8> {
        self.pieces(c, PieceKind::King).lsb()
    }

    pub fn piece_at(&self, sq: u8) -> Option<Piece> {
        self.board[sq as usize]
    }
    pub fn set_piece(&mut self, sq: u8, pc: Option<Piece>) {
        self.board[sq as usize] = pc;
    }

    /// Squares holding pieces of the given colour and kind.
    pub fn pieces(&self, c: Color, kind: PieceKind) -> Bitboard {
        let mut bb = Bitboard::EMPTY;
        for (i, slot) in self.board.iter().enumerate() {
            if let Some(pc) = slot
                && pc.color == c
                && pc.kind == kind
            {
                bb.set(i as u8);
            }
        }
        bb
    }

    /// All squares holding a piece of colour `c`.
    pub fn occupied_by(&self, c: Color) -> Bitboard {
        let mut bb = Bitboard::EMPTY;
        for (i, slot) in self.board.iter().enumerate() {
            if matches!(slot, Some(pc) if pc.color == c) {
                bb.set(i as u8);
            }
        }
        bb
    }

    pub fn count(&self, c: Color, kind: PieceKind) -> u32 {
        self.pieces(c, kind).popcount()
    }

    pub fn in_check(&self, c: Color) -> bool {
        let ksq = match self.king_sq(c) {
            Some(s) => s,
            None => return false,
        };
        self.is_square_attacked(ksq, c.other())
    }

    pub fn is_square_attacked(&self, target: u8, by: Color) -> bool {
        !self.scan_attackers(target, by, true).is_empty()
    }

    /// Squares of `by` pieces that attack `target`.
    pub fn attackers(&self, target: u8, by: Color) -> Bitboard {
        self.scan_attackers(target, by, false)
    }

    /// Number of `by` pieces attacking `target`.
    pub fn attackers_of(&self, target: u8, by: Color) -> u32 {
        self.attackers(target, by).popcount()
    }

    fn scan_attackers(&self, target: u8, by: Color, first_only: bool) -> Bitboard {
        let tf = file_of(target);
        let tr = rank_of(target);
        let mut found = Bitboard::EMPTY;
        let is = |s: u8, kinds: &[PieceKind]| {
            matches!(self.piece_at(s), Some(pc) if pc.color == by && kinds.contains(&pc.kind))
        };

        // A `by` pawn attacks diagonally forward, so it sits one rank behind.
        for df in [-1, 1] {
            if let Some(s) = sq(tf + df, tr - by.forward())
                && is(s, [PieceKind::Pawn].as_slice())
            {
                found.set(s);
            }
        }
        for (df, dr) in KNIGHT_STEPS {
            if let Some(s) = sq(tf + df, tr + dr)
                && is(s, [PieceKind::Knight].as_slice())
            {
                found.set(s);
            }
        }
        for (df, dr) in KING_STEPS {
            if let Some(s) = sq(tf + df, tr + dr)
                && is(s, [PieceKind::King].as_slice())
            {
                found.set(s);
            }
        }
        if first_only && !found.is_empty() {
            return found;
        }

        let sliders = [
            (DIAGONALS, [PieceKind::Bishop, PieceKind::Queen]),
            (ORTHOGONALS, [PieceKind::Rook, PieceKind::Queen]),
        ];
        for (dirs, kinds) in sliders {
            for (df, dr) in dirs {
                if let Some(s) = self.first_occupied(target, df, dr)
                    && is(s, kinds.as_slice())
                {
                    found.set(s);
                    if first_only {
                        return found;
                    }
                }
            }
        }
        found
    }

    fn first_occupied(&self, from: u8, df: i8, dr: i8) -> Option<u8> {
        let mut f = file_of(from) + df;
        let mut r = rank_of(from) + dr;
        while let Some(s) = sq(f, r) {
            if self.piece_at(s).is_some() {
                return Some(s);
            }
            f += df;
            r += dr;
        }
        None
    }

    /// Squares attacked by the piece standing on `from` (empty if none).
    ///
    /// Slider rays stop at, and include, the first occupied square.
    pub fn attacks_from(&self, from: u8) -> Bitboard {
        let Some(pc) = self.piece_at(from) else {
            return Bitboard::EMPTY;
        };
        match pc.kind {
            PieceKind::Pawn => {
                let fwd = pc.color.forward();
                step_targets(from, &[(-1, fwd), (1, fwd)])
            }
            PieceKind::Knight => step_targets(from, &KNIGHT_STEPS),
            PieceKind::King => step_targets(from, &KING_STEPS),
            PieceKind::Bishop => self.ray_attacks(from, &DIAGONALS),
            PieceKind::Rook => self.ray_attacks(from, &ORTHOGONALS),
            PieceKind::Queen => {
                self.ray_attacks(from, &DIAGONALS) | self.ray_attacks(from, &ORTHOGONALS)
            }
        }
    }

    /// Squares reachable along `dirs` from `from`, stopping at the first blocker.
    pub fn ray_attacks(&self, from: u8, dirs: &[(i8, i8)]) -> Bitboard {
        let mut bb = Bitboard::EMPTY;
        for &(df, dr) in dirs {
            let mut f = file_of(from) + df;
            let mut r = rank_of(from) + dr;
            while let Some(s) = sq(f, r) {
                bb.set(s);
                if self.piece_at(s).is_some() {
                    break;
                }
                f += df;
                r += dr;
            }
        }
        bb
    }

    /// Same board with `c` to move and no en-passant square.
    ///
    /// Used to ask what a side could do when it is not its turn.
    pub fn with_side_to_move(&self, c: Color) -> Position {
        let mut p = self.clone();
        if p.side_to_move != c {
            p.side_to_move = c;
            p.en_passant = None;
        }
        p
    }

    /// Plays a legal move on a copy of the position.
    ///
    /// The move is matched against generated legal moves by squares and
    /// promotion, so callers need not set castle / en-passant flags.
    pub fn apply(&self, mv: Move) -> Result<Applied, RulesError> {
        let legal = self.find_legal(mv)?;
        let mut next = self.clone();
        next.make_move(legal);
        let mover = self.side_to_move;
        let is_check = next.in_check(mover.other());
        let no_replies = legal_moves(&next).is_empty();
        Ok(Applied {
            is_checkmate: is_check && no_replies,
            is_stalemate: !is_check && no_replies,
            is_check,
            position: next,
        })
    }

    /// The generated legal move matching `mv`, with its flags filled in.
    pub fn find_legal(&self, mv: Move) -> Result<Move, RulesError> {
        if self.piece_at(mv.from).is_none() {
            return Err(RulesError::NoPieceAt {
                square: sq_to_coord(mv.from),
            });
        }
        legal_moves(self)
            .into_iter()
            .find(|m| m.same_squares(&mv))
            .ok_or_else(|| RulesError::IllegalMove {
                uci: move_to_uci(mv),
                fen: self.to_fen(),
            })
    }

    /// Fills in the castle / en-passant flags a bare origin-destination move
    /// implies in this position. Legality is not checked.
    pub fn annotate(&self, mut mv: Move) -> Move {
        match self.piece_at(mv.from).map(|pc| pc.kind) {
            Some(PieceKind::King) => {
                mv.is_castle |= (file_of(mv.from) - file_of(mv.to)).abs() == 2;
            }
            Some(PieceKind::Pawn) => {
                mv.is_en_passant |=
                    self.en_passant == Some(mv.to) && file_of(mv.from) != file_of(mv.to);
            }
            _ => {}
        }
        mv
    }

    /// Plays `mv` in place.
    ///
    /// # Panics
    /// If there is no piece on the origin square. Only pass moves produced by
    /// the move generator; use [`Position::apply`] for untrusted input.
    pub fn make_move(&mut self, mv: Move) -> Undo {
        let from = mv.from;
        let to = mv.to;
        let moved = self.piece_at(from).expect("no piece on from-square");
        let mut captured = self.piece_at(to);
        let prev_castling = self.castling.clone();
        let prev_ep = self.en_passant;
        let prev_hmc = self.halfmove_clock;
        let prev_fmn = self.fullmove_number;

        self.en_passant = None;
        let mut reset_hmc = moved.kind == PieceKind::Pawn || captured.is_some();

        let mut ep_captured_sq = None;
        if mv.is_en_passant
            && let Some(cs) = sq(file_of(to), rank_of(to) - moved.color.forward())
        {
            captured = self.piece_at(cs);
            self.set_piece(cs, None);
            ep_captured_sq = Some(cs);
            reset_hmc = true;
        }

        self.set_piece(from, None);
        let promotes = moved.kind == PieceKind::Pawn && rank_of(to) == moved.color.other().back_rank();
        let landed = if promotes {
            Piece::new(moved.color, mv.promo.unwrap_or(PieceKind::Queen))
        } else {
            moved
        };
        self.set_piece(to, Some(landed));

        // Rook hop for castling, keyed on the king's destination.
        let mut rook_move = None;
        if mv.is_castle && moved.kind == PieceKind::King {
            let hop = match (from, to) {
                (4, 6) => Some((7, 5)),
                (4, 2) => Some((0, 3)),
                (60, 62) => Some((63, 61)),
                (60, 58) => Some((56, 59)),
                _ => None,
            };
            if let Some((rf, rt)) = hop
                && let Some(rook) = self.piece_at(rf)
            {
                self.set_piece(rf, None);
                self.set_piece(rt, Some(rook));
                rook_move = Some((rf, rt));
            }
        }

        self.castling.touch(from);
        self.castling.touch(to);

        if moved.kind == PieceKind::Pawn && (rank_of(to) - rank_of(from)).abs() == 2 {
            self.en_passant = sq(file_of(from), (rank_of(from) + rank_of(to)) / 2);
        }

        self.halfmove_clock = if reset_hmc {
            0
        } else {
            self.halfmove_clock + 1
        };
        if self.side_to_move == Color::Black {
            self.fullmove_number += 1;
        }
        self.side_to_move = self.side_to_move.other();

        Undo {
            captured,
            castling: prev_castling,
            en_passant: prev_ep,
            halfmove_clock: prev_hmc,
            fullmove_number: prev_fmn,
            moved_piece: moved,
            rook_move,
            ep_captured_sq,
        }
    }

    pub fn unmake_move(&mut self, mv: Move, undo: Undo) {
        self.side_to_move = self.side_to_move.other();
        self.castling = undo.castling;
        self.en_passant = undo.en_passant;
        self.halfmove_clock = undo.halfmove_clock;
        self.fullmove_number = undo.fullmove_number;

        if let Some((rf, rt)) = undo.rook_move {
            let rook = self.piece_at(rt);
            self.set_piece(rt, None);
            self.set_piece(rf, rook);
        }

        // The moved piece goes back as it was, which also undoes promotion.
        self.set_piece(mv.to, None);
        self.set_piece(mv.from, Some(undo.moved_piece));

        match undo.ep_captured_sq {
            Some(cs) => self.set_piece(cs, undo.captured),
            None => self.set_piece(mv.to, undo.captured),
        }
    }
}

fn step_targets(from: u8, deltas: &[(i8, i8)]) -> Bitboard {
    let mut bb = Bitboard::EMPTY;
    for (df, dr) in deltas {
        if let Some(s) = sq(file_of(from) + df, rank_of(from) + dr) {
            bb.set(s);
        }
    }
    bb
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

#[cfg(test)]
#[path = "board_tests.rs"]
mod board_tests;
