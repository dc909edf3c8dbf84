//! Client binding for the SolLearning on-chain program.
//!
//! The program itself is an external collaborator. This crate only knows how
//! to address it: the program id, the seeds of its PDAs, and how to lay out
//! the accounts and data of the `initialize` instruction so the program's
//! Anchor account validation accepts them.

use solana_sdk::hash::hashv;
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;

/// Default address of the deployed SolLearning program.
pub const ID: Pubkey = solana_sdk::pubkey!("6F7BtsWEyMSf3RxKxxCxyJEdWJDMiuBsMMpMEWvbJGtm");

/// SPL Token program.
pub const TOKEN_PROGRAM_ID: Pubkey =
	solana_sdk::pubkey!("TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA");

/// SPL Associated Token Account program.
pub const ASSOCIATED_TOKEN_PROGRAM_ID: Pubkey =
	solana_sdk::pubkey!("ATokenGPvbdGVxr1b2hvZbsiqW5xWH25efTNsLJA8knL");

/// Seed of the global program state PDA.
pub const PROGRAM_STATE_SEED: &[u8] = b"program-state";

/// Returns the 8-byte Anchor discriminator of an instruction handler.
///
/// Anchor prefixes instruction data with `sha256("global:<name>")[..8]`.
pub fn instruction_discriminator(name: &str) -> [u8; 8] {
	let preimage = format!("global:{}", name);
	let hash = hashv(&[preimage.as_bytes()]);
	let mut discriminator = [0u8; 8];
	discriminator.copy_from_slice(&hash.to_bytes()[..8]);
	discriminator
}

/// Derives the program state PDA and its bump.
pub fn find_program_state_address(program_id: &Pubkey) -> (Pubkey, u8) {
	Pubkey::find_program_address(&[PROGRAM_STATE_SEED], program_id)
}

/// Derives the associated token account of `wallet` for `mint`.
pub fn find_associated_token_address(wallet: &Pubkey, mint: &Pubkey) -> Pubkey {
	Pubkey::find_program_address(
		&[wallet.as_ref(), TOKEN_PROGRAM_ID.as_ref(), mint.as_ref()],
		&ASSOCIATED_TOKEN_PROGRAM_ID,
	)
	.0
}

pub mod accounts {
	//! Account sets of the program's instructions.

	use super::*;

	/// Accounts of the `initialize` instruction, in the order the program
	/// declares them.
	#[derive(Debug, Clone, PartialEq, Eq)]
	pub struct Initialize {
		pub authority: Pubkey,
		pub program_state: Pubkey,
		pub token_mint: Pubkey,
		pub authority_token_account: Pubkey,
		pub system_program: Pubkey,
		pub token_program: Pubkey,
		pub associated_token_program: Pubkey,
		pub rent: Pubkey,
	}

	impl Initialize {
		/// Resolves every derived account from the two signers.
		///
		/// `authority` signs and pays for the new accounts; `token_mint` is a
		/// fresh keypair address the program creates the mint at.
		pub fn resolve(program_id: &Pubkey, authority: Pubkey, token_mint: Pubkey) -> Self {
			let (program_state, _) = find_program_state_address(program_id);
			Self {
				authority,
				program_state,
				token_mint,
				authority_token_account: find_associated_token_address(&authority, &token_mint),
				system_program: solana_sdk::system_program::ID,
				token_program: TOKEN_PROGRAM_ID,
				associated_token_program: ASSOCIATED_TOKEN_PROGRAM_ID,
				rent: solana_sdk::sysvar::rent::ID,
			}
		}

		/// Converts the set into instruction account metas.
		pub fn to_account_metas(&self) -> Vec<AccountMeta> {
			vec![
				AccountMeta::new(self.authority, true),
				AccountMeta::new(self.program_state, false),
				AccountMeta::new(self.token_mint, true),
				AccountMeta::new(self.authority_token_account, false),
				AccountMeta::new_readonly(self.system_program, false),
				AccountMeta::new_readonly(self.token_program, false),
				AccountMeta::new_readonly(self.associated_token_program, false),
				AccountMeta::new_readonly(self.rent, false),
			]
		}
	}
}

pub mod instruction {
	//! Instruction builders.

	use super::*;

	/// Builds the `initialize` instruction. It carries no argument payload.
	pub fn initialize(program_id: &Pubkey, accounts: &accounts::Initialize) -> Instruction {
		Instruction {
			program_id: *program_id,
			accounts: accounts.to_account_metas(),
			data: instruction_discriminator("initialize").to_vec(),
		}
	}
}
