use alloy_primitives::Bytes;

use crate::bindings::{DAPayload as WireDaPayload, IProofServiceManager, ProofVerificationData};

/// Proving systems the operator can verify, tagged as they appear on the
/// wire. Adding support for a new system means adding a variant here and a
/// handler in the verifier registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum ProvingSystemId {
    /// PLONK over BLS12-381.
    GnarkPlonkBls12_381 = 0,
    /// PLONK over BN254.
    GnarkPlonkBn254 = 1,
    /// SP1 zkVM proof of a RISC-V guest program.
    Sp1 = 2,
}

impl ProvingSystemId {
    /// The wire tag for this proving system.
    pub const fn as_u16(self) -> u16 {
        self as u16
    }
}

impl TryFrom<u16> for ProvingSystemId {
    type Error = TaskDecodeError;

    fn try_from(tag: u16) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(Self::GnarkPlonkBls12_381),
            1 => Ok(Self::GnarkPlonkBn254),
            2 => Ok(Self::Sp1),
            other => Err(TaskDecodeError::UnknownProvingSystem(other)),
        }
    }
}

/// Where the proof bytes for one verification live.
///
/// The wire format squeezes every backend into a shared
/// `(proofAssociatedData, index)` pair; the variants here give each field its
/// actual meaning so the fetcher has a single dispatch point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DaPayload {
    /// Proof bytes posted inline with the task.
    Calldata {
        /// The proof itself, verbatim.
        data: Bytes,
    },
    /// Proof blob dispersed through EigenDA.
    EigenDa {
        /// Batch header hash understood by the disperser.
        batch_header_hash: Bytes,
        /// Position of the blob within the batch.
        blob_index: u64,
    },
    /// Proof blob posted to Celestia under the operator's configured
    /// namespace.
    Celestia {
        /// Celestia block height the blob was included at.
        height: u64,
        /// Commitment identifying the blob within the block.
        commitment: Bytes,
    },
}

const DA_SOLUTION_CALLDATA: u8 = 0;
const DA_SOLUTION_EIGENDA: u8 = 1;
const DA_SOLUTION_CELESTIA: u8 = 2;

impl TryFrom<&WireDaPayload> for DaPayload {
    type Error = TaskDecodeError;

    fn try_from(wire: &WireDaPayload) -> Result<Self, Self::Error> {
        match wire.solution {
            DA_SOLUTION_CALLDATA => Ok(Self::Calldata {
                data: wire.proofAssociatedData.clone(),
            }),
            DA_SOLUTION_EIGENDA => Ok(Self::EigenDa {
                batch_header_hash: wire.proofAssociatedData.clone(),
                blob_index: wire.index,
            }),
            DA_SOLUTION_CELESTIA => Ok(Self::Celestia {
                height: wire.index,
                commitment: wire.proofAssociatedData.clone(),
            }),
            other => Err(TaskDecodeError::UnknownDaSolution(other)),
        }
    }
}

/// A task could not be mapped into the domain model. Any of these abandons
/// the whole task: a response with a hole in it cannot be aggregated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskDecodeError {
    /// The proving system tag is not in the supported set.
    #[error("unrecognized proving system ID {0}")]
    UnknownProvingSystem(u16),
    /// The DA solution tag does not name a known backend.
    #[error("unrecognized DA solution tag {0}")]
    UnknownDaSolution(u8),
}

/// One proof to verify, fully decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofVerification {
    /// Which verifier handles this proof.
    pub proving_system: ProvingSystemId,
    /// Where the proof bytes live.
    pub da_payload: DaPayload,
    /// Public input to the proof. SP1 overloads this with the guest ELF.
    pub pub_input: Bytes,
    /// Verifying key for the proof's circuit.
    pub verification_key: Bytes,
}

impl TryFrom<&ProofVerificationData> for ProofVerification {
    type Error = TaskDecodeError;

    fn try_from(wire: &ProofVerificationData) -> Result<Self, Self::Error> {
        Ok(Self {
            proving_system: ProvingSystemId::try_from(wire.provingSystemId)?,
            da_payload: DaPayload::try_from(&wire.daPayload)?,
            pub_input: wire.pubInput.clone(),
            verification_key: wire.verificationKey.clone(),
        })
    }
}

/// A decoded verification task. Proof order is significant and is preserved
/// into the response's result vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Index assigned to the task by the service manager.
    pub task_index: u32,
    /// Block at which the task was created on-chain.
    pub task_created_block: u64,
    /// The proofs to verify, in announcement order.
    pub proof_verifications: Vec<ProofVerification>,
}

impl TryFrom<&IProofServiceManager::NewTaskCreated> for NewTask {
    type Error = TaskDecodeError;

    fn try_from(event: &IProofServiceManager::NewTaskCreated) -> Result<Self, Self::Error> {
        let proof_verifications = event
            .task
            .proofVerificationsData
            .iter()
            .map(ProofVerification::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            task_index: event.taskIndex,
            task_created_block: event.task.taskCreatedBlock,
            proof_verifications,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::BatchProofVerificationTask;

    fn wire_proof(system: u16, solution: u8, data: &[u8], index: u64) -> ProofVerificationData {
        ProofVerificationData {
            provingSystemId: system,
            daPayload: WireDaPayload {
                solution,
                proofAssociatedData: Bytes::copy_from_slice(data),
                index,
            },
            pubInput: Bytes::from_static(b"pub"),
            verificationKey: Bytes::from_static(b"vk"),
        }
    }

    fn event_with(proofs: Vec<ProofVerificationData>) -> IProofServiceManager::NewTaskCreated {
        IProofServiceManager::NewTaskCreated {
            taskIndex: 7,
            task: BatchProofVerificationTask {
                taskCreatedBlock: 42,
                proofVerificationsData: proofs,
            },
        }
    }

    #[test]
    fn decodes_calldata_payload_verbatim() {
        let event = event_with(vec![wire_proof(0, DA_SOLUTION_CALLDATA, b"proof bytes", 99)]);
        let task = NewTask::try_from(&event).unwrap();

        assert_eq!(task.task_index, 7);
        assert_eq!(task.task_created_block, 42);
        assert_eq!(task.proof_verifications.len(), 1);
        assert_eq!(
            task.proof_verifications[0].da_payload,
            DaPayload::Calldata {
                data: Bytes::from_static(b"proof bytes")
            }
        );
    }

    #[test]
    fn unpacks_eigenda_and_celestia_locators() {
        let event = event_with(vec![
            wire_proof(1, DA_SOLUTION_EIGENDA, b"batch-hash", 3),
            wire_proof(2, DA_SOLUTION_CELESTIA, b"commitment", 1234),
        ]);
        let task = NewTask::try_from(&event).unwrap();

        assert_eq!(
            task.proof_verifications[0].da_payload,
            DaPayload::EigenDa {
                batch_header_hash: Bytes::from_static(b"batch-hash"),
                blob_index: 3,
            }
        );
        assert_eq!(
            task.proof_verifications[1].da_payload,
            DaPayload::Celestia {
                height: 1234,
                commitment: Bytes::from_static(b"commitment"),
            }
        );
    }

    #[test]
    fn unknown_proving_system_fails_the_whole_task() {
        let event = event_with(vec![
            wire_proof(0, DA_SOLUTION_CALLDATA, b"ok", 0),
            wire_proof(0xFFFF, DA_SOLUTION_CALLDATA, b"bad", 0),
        ]);

        assert_eq!(
            NewTask::try_from(&event),
            Err(TaskDecodeError::UnknownProvingSystem(0xFFFF))
        );
    }

    #[test]
    fn unknown_da_solution_fails_the_whole_task() {
        let event = event_with(vec![wire_proof(0, 9, b"bytes", 0)]);

        assert_eq!(
            NewTask::try_from(&event),
            Err(TaskDecodeError::UnknownDaSolution(9))
        );
    }

    #[test]
    fn proving_system_tags_round_trip() {
        for id in [
            ProvingSystemId::GnarkPlonkBls12_381,
            ProvingSystemId::GnarkPlonkBn254,
            ProvingSystemId::Sp1,
        ] {
            assert_eq!(ProvingSystemId::try_from(id.as_u16()), Ok(id));
        }
    }
}
