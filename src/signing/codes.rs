//! Compilation error codes
//!
//! The chain-agnostic `error_code` catalogue. The integer space is open:
//! producers built against a newer catalogue may send codes this build has
//! never heard of, and those must still read as failures.

use std::fmt;

/// Outcome of one compilation attempt, as carried in `error_code`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SigningErrorCode {
    Ok,
    General,
    Internal,
    LowBalance,
    ZeroAmountRequested,
    MissingPrivateKey,
    WrongFee,
    Signing,
    TxTooBig,
    MissingInputUtxos,
    NotEnoughUtxos,
    ScriptRedeem,
    ScriptOutput,
    ScriptWitnessProgram,
    InvalidMemo,
    InvalidPrivateKey,
    InvalidAddress,
    InvalidUtxo,
    InvalidUtxoAmount,
    InputParse,
    NoSupportN2n,
    SignaturesCount,
    InvalidParams,
    InvalidRequestedTokenAmount,
    NotSupported,
    DustAmountRequested,
    /// A nonzero code outside this catalogue
    Unrecognized(i32),
}

impl SigningErrorCode {
    pub fn from_i32(code: i32) -> Self {
        use SigningErrorCode::*;
        match code {
            0 => Ok,
            1 => General,
            2 => Internal,
            3 => LowBalance,
            4 => ZeroAmountRequested,
            5 => MissingPrivateKey,
            6 => WrongFee,
            7 => Signing,
            8 => TxTooBig,
            9 => MissingInputUtxos,
            10 => NotEnoughUtxos,
            11 => ScriptRedeem,
            12 => ScriptOutput,
            13 => ScriptWitnessProgram,
            14 => InvalidMemo,
            15 => InvalidPrivateKey,
            16 => InvalidAddress,
            17 => InvalidUtxo,
            18 => InvalidUtxoAmount,
            19 => InputParse,
            20 => NoSupportN2n,
            21 => SignaturesCount,
            22 => InvalidParams,
            23 => InvalidRequestedTokenAmount,
            24 => NotSupported,
            25 => DustAmountRequested,
            other => Unrecognized(other),
        }
    }

    pub fn to_i32(self) -> i32 {
        use SigningErrorCode::*;
        match self {
            Ok => 0,
            General => 1,
            Internal => 2,
            LowBalance => 3,
            ZeroAmountRequested => 4,
            MissingPrivateKey => 5,
            WrongFee => 6,
            Signing => 7,
            TxTooBig => 8,
            MissingInputUtxos => 9,
            NotEnoughUtxos => 10,
            ScriptRedeem => 11,
            ScriptOutput => 12,
            ScriptWitnessProgram => 13,
            InvalidMemo => 14,
            InvalidPrivateKey => 15,
            InvalidAddress => 16,
            InvalidUtxo => 17,
            InvalidUtxoAmount => 18,
            InputParse => 19,
            NoSupportN2n => 20,
            SignaturesCount => 21,
            InvalidParams => 22,
            InvalidRequestedTokenAmount => 23,
            NotSupported => 24,
            DustAmountRequested => 25,
            Unrecognized(code) => code,
        }
    }

    /// Only code 0 is success
    pub fn is_ok(self) -> bool {
        self.to_i32() == 0
    }

    pub fn is_known(self) -> bool {
        !matches!(self, SigningErrorCode::Unrecognized(_))
    }

    /// Stable snake_case identifier
    pub fn name(self) -> &'static str {
        use SigningErrorCode::*;
        match self {
            Ok => "ok",
            General => "general",
            Internal => "internal",
            LowBalance => "low_balance",
            ZeroAmountRequested => "zero_amount_requested",
            MissingPrivateKey => "missing_private_key",
            WrongFee => "wrong_fee",
            Signing => "signing",
            TxTooBig => "tx_too_big",
            MissingInputUtxos => "missing_input_utxos",
            NotEnoughUtxos => "not_enough_utxos",
            ScriptRedeem => "script_redeem",
            ScriptOutput => "script_output",
            ScriptWitnessProgram => "script_witness_program",
            InvalidMemo => "invalid_memo",
            InvalidPrivateKey => "invalid_private_key",
            InvalidAddress => "invalid_address",
            InvalidUtxo => "invalid_utxo",
            InvalidUtxoAmount => "invalid_utxo_amount",
            InputParse => "input_parse",
            NoSupportN2n => "no_support_n2n",
            SignaturesCount => "signatures_count",
            InvalidParams => "invalid_params",
            InvalidRequestedTokenAmount => "invalid_requested_token_amount",
            NotSupported => "not_supported",
            DustAmountRequested => "dust_amount_requested",
            Unrecognized(_) => "unrecognized",
        }
    }

    /// Fallback text when a producer sends a code without a message
    pub fn description(self) -> &'static str {
        use SigningErrorCode::*;
        match self {
            Ok => "",
            General => "Unknown error",
            Internal => "Internal error",
            LowBalance => "Low balance: the sender balance is not enough to cover the send and other auxiliary amount such as fee, deposit, or minimal balance",
            ZeroAmountRequested => "Requested amount is zero, send of 0 makes no sense",
            MissingPrivateKey => "One required key is missing (too few or wrong keys are provided)",
            WrongFee => "A fee is required but not provided or is invalid",
            Signing => "General signing error",
            TxTooBig => "Resulting transaction is too large",
            MissingInputUtxos => "No input UTXOs provided",
            NotEnoughUtxos => "Not enough non-dust input UTXOs to cover requested amount",
            ScriptRedeem => "Missing required redeem script",
            ScriptOutput => "Invalid required output script",
            ScriptWitnessProgram => "Unrecognized witness program",
            InvalidMemo => "Invalid memo",
            InvalidPrivateKey => "Invalid private key",
            InvalidAddress => "Invalid address",
            InvalidUtxo => "Invalid input UTXO",
            InvalidUtxoAmount => "Invalid input UTXO amount",
            InputParse => "Failed to parse the transaction input",
            NoSupportN2n => "Multi-input and multi-output transfer is not supported",
            SignaturesCount => "Signature count does not match the number of inputs",
            InvalidParams => "Invalid input parameter",
            InvalidRequestedTokenAmount => "Invalid requested token amount",
            NotSupported => "Operation not supported for this chain",
            DustAmountRequested => "Requested amount is too low (below the dust threshold)",
            Unrecognized(_) => "Unrecognized error code",
        }
    }
}

impl From<i32> for SigningErrorCode {
    fn from(code: i32) -> Self {
        Self::from_i32(code)
    }
}

impl From<SigningErrorCode> for i32 {
    fn from(code: SigningErrorCode) -> Self {
        code.to_i32()
    }
}

impl fmt::Display for SigningErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SigningErrorCode::Unrecognized(code) => write!(f, "unrecognized({})", code),
            known => write!(f, "{}", known.name()),
        }
    }
}
