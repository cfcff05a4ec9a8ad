use alloy_sol_types::sol;

sol! {
    /// Locator for the proof bytes of a single verification on a
    /// data-availability backend. `solution` selects the backend; the
    /// interpretation of `proofAssociatedData` and `index` depends on it:
    /// inline proof bytes for calldata, batch header hash + blob index for
    /// EigenDA, commitment + block height for Celestia. The pair is a wire
    /// format artifact; [`crate::DaPayload`] unpacks it at decode time.
    struct DAPayload {
        uint8 solution;
        bytes proofAssociatedData;
        uint64 index;
    }

    /// One proof to verify: the proving system it belongs to, where its
    /// bytes live, the public input, and the verifying key. For SP1 tasks
    /// `pubInput` carries the guest ELF instead of a public witness.
    struct ProofVerificationData {
        uint16 provingSystemId;
        DAPayload daPayload;
        bytes pubInput;
        bytes verificationKey;
    }

    /// A batch of proof verifications announced on-chain.
    struct BatchProofVerificationTask {
        uint64 taskCreatedBlock;
        ProofVerificationData[] proofVerificationsData;
    }

    /// The response shape committed on-chain. This struct, ABI-encoded, is
    /// what the operator's BLS signature is computed over.
    struct BatchProofVerificationTaskResponse {
        uint32 taskIndex;
        bool[] proofResults;
    }

    interface IProofServiceManager {
        /// Emitted by the service manager for every new verification task.
        event NewTaskCreated(uint32 indexed taskIndex, BatchProofVerificationTask task);

        #[sol(rpc)]
        function isOperatorRegistered(address operator) external view returns (bool);
    }
}
