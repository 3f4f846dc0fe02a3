#![deny(missing_docs)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

/*! # txcomposer

Incremental composition of Bitcoin SV transactions: P2PKH and data outputs, fee-aware
change settlement, BIP-143 sighash preimages and signature injection.

Signing can happen in-process with a private key, or in two phases: the composer emits
signing requests, an external signer (a hardware wallet, a remote service) answers them,
and the composer injects the results, filling placeholder pushes in templated unlocking
scripts where present. Composer state serializes to JSON so both phases may run in
different processes.

## Usage
```
use txcomposer::composer::TxComposer;
use txcomposer::messages::OutPoint;
use txcomposer::util::Hash256;

let address = "13PNN3hx4wxHBLFwLNNwmKxD6V5jFZQo6s";
let mut composer = TxComposer::default();
let utxo = OutPoint { hash: Hash256([1; 32]), index: 0 };
composer.append_p2pkh_input(utxo, address, 100_000).unwrap();
composer.append_p2pkh_output(address, 50_000).unwrap();
assert_eq!(composer.append_change_output(address).unwrap(), Some(1));
assert_eq!(composer.change_utxo().unwrap().satoshis, 49_887);
```

## Scope
No script interpreter, coin selection or broadcasting. Signatures are checked for P2PKH
inputs only.
*/

pub mod address;
pub mod composer;
pub mod messages;
pub mod network;
pub mod script;
pub mod transaction;
pub mod util;
